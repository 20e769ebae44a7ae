mod exporter;
mod format;
pub mod formats;

pub use exporter::{Exporter, file_name, sanitize_component, date_suffix, today};
pub use format::{ExportFormat, ExportRenderer};
