//! CLI command handling module

mod commands;
mod logging;

pub use commands::{handle_defaults, handle_status, render_status};
pub use logging::*;
