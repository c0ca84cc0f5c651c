//! GUI module - Blocking chart windows

mod app;

pub use app::show_blocking;
