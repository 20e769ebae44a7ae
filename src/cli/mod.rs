pub mod app;
mod commands;
pub mod display;

pub use app::{App, run};
pub use commands::{Args, Commands, ConfigSubcommand};
