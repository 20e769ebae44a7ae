pub mod json;
pub mod csv;

pub use super::format::{ExportFormat, ExportRenderer};
