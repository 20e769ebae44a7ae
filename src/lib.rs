pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod utils;

// Re-export main types for easier access
pub use api::{
    ApiClient,
    QueryResult,
    Target,
    Stats,
    StatKind,
    Transport
};
pub use cli::App;
pub use config::Config;
pub use error::{DdosintError, DdosintResult};
pub use export::{Exporter, ExportFormat};
pub use utils::HttpClient;
