mod client;
mod model;
pub mod transport;

pub use client::{ApiClient, validate_date, DEFAULT_RECENT_LIMIT};
pub use model::{
    Scalar,
    Target,
    Stats,
    QueryResult,
    OverviewStats,
    StatsReport,
    DateEntry,
    StatKind
};
pub use transport::{RawResponse, Transport};
