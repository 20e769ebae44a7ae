use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::export::ExportFormat;

const EXAMPLES: &str = "\
Examples:
  # Extract targets for a specific date
  ddosint extract 2024-01-15 --format csv --output-dir ./exports

  # Search for a host
  ddosint search example.com --limit 10

  # Get overview statistics
  ddosint stats overview

  # List available dates
  ddosint dates --limit 20";

#[derive(Parser, Debug)]
#[command(name = "ddosint", version)]
#[command(about = "DDoSINT - DDoSia Intelligence CLI Tool")]
#[command(after_help = EXAMPLES)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, global = true, env = "DDOSIA_BASE_URL", help = "Base URL of the DDoSia monitor instance [default: https://ddosia.rfeed.it]")]
    pub base_url: Option<String>,

    #[arg(long, global = true, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, short, global = true, help = "Path to a configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, short, global = true, help = "Enable debug logging")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract targets for a specific date
    Extract {
        #[arg(help = "Date in YYYY-MM-DD format")]
        date: String,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json, help = "Output format")]
        format: ExportFormat,

        #[arg(short, long, help = "Output directory (default: current directory)")]
        output_dir: Option<PathBuf>,

        #[arg(short, long, help = "Filename prefix (default: targets)")]
        prefix: Option<String>,

        #[arg(long, help = "Print the rendered output instead of writing a file")]
        stdout: bool,
    },

    /// Search for targets by host
    Search {
        #[arg(help = "Host name or partial match")]
        host: String,

        #[arg(short, long, help = "Limit number of results")]
        limit: Option<usize>,

        #[arg(short, long, help = "Export results to file")]
        export: bool,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json, help = "Export format")]
        format: ExportFormat,

        #[arg(short, long, help = "Output directory (default: current directory)")]
        output_dir: Option<PathBuf>,

        #[arg(long, help = "Print the rendered results instead of the summary")]
        stdout: bool,
    },

    /// Display statistics
    Stats {
        #[arg(help = "Type of statistics (overview, by_year, by_month, by_day, timeseries_monthly, timeseries_daily)")]
        r#type: String,

        #[arg(short, long, help = "Export results to JSON file")]
        export: bool,

        #[arg(short, long, help = "Output directory (default: current directory)")]
        output_dir: Option<PathBuf>,
    },

    /// List available dates with data
    Dates {
        #[arg(short, long, help = "Limit number of dates displayed")]
        limit: Option<usize>,
    },

    /// Show targets detected in the last two days
    Recent {
        #[arg(short, long, help = "Maximum number of targets (default: 20)")]
        limit: Option<usize>,

        #[arg(short, long, help = "Export results to file")]
        export: bool,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json, help = "Export format")]
        format: ExportFormat,

        #[arg(short, long, help = "Output directory (default: current directory)")]
        output_dir: Option<PathBuf>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Write the default configuration file
    Init {
        #[arg(short, long, help = "Force overwrite existing configuration")]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}
