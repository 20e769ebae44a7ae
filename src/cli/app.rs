use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::api::{ApiClient, QueryResult, StatKind, Transport};
use crate::config::Config;
use crate::error::{DdosintError, DdosintResult};
use crate::export::{self, ExportFormat, Exporter};
use crate::utils::http::HttpClient;

use super::commands::{Args, Commands, ConfigSubcommand};
use super::display;

/// The main application struct
pub struct App<T: Transport> {
    config: Config,
    client: ApiClient<T>,
}

impl App<HttpClient> {
    /// Build an application that talks to the network
    pub fn from_config(config: Config) -> DdosintResult<Self> {
        let transport = HttpClient::from_config(&config.api)?;
        Self::new(config, transport)
    }
}

impl<T: Transport> App<T> {
    /// Create a new application instance over any transport
    pub fn new(config: Config, transport: T) -> DdosintResult<Self> {
        let client = ApiClient::new(transport, &config.api.base_url)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one API command; output goes to stdout
    pub async fn run_command(&self, command: &Commands) -> DdosintResult<()> {
        let output = self.execute(command).await?;
        print!("{}", output);
        Ok(())
    }

    /// Run one API command and return what it would print
    pub async fn execute(&self, command: &Commands) -> DdosintResult<String> {
        match command {
            Commands::Extract { date, format, output_dir, prefix, stdout } => {
                self.handle_extract(date, *format, output_dir.as_deref(), prefix.as_deref(), *stdout).await
            },
            Commands::Search { host, limit, export, format, output_dir, stdout } => {
                self.handle_search(host, *limit, *export, *format, output_dir.as_deref(), *stdout).await
            },
            Commands::Stats { r#type, export, output_dir } => {
                self.handle_stats(r#type, *export, output_dir.as_deref()).await
            },
            Commands::Dates { limit } => {
                self.handle_dates(*limit).await
            },
            Commands::Recent { limit, export, format, output_dir } => {
                self.handle_recent(*limit, *export, *format, output_dir.as_deref()).await
            },
            Commands::Config { .. } => Err(DdosintError::InvalidInput(
                "config commands do not query the API".to_string()
            )),
        }
    }

    fn exporter(&self, output_dir: Option<&Path>) -> Exporter {
        let dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.export.output_dir.clone());
        Exporter::new(expand_home(&dir))
    }

    async fn handle_extract(
        &self,
        date: &str,
        format: ExportFormat,
        output_dir: Option<&Path>,
        prefix: Option<&str>,
        stdout: bool,
    ) -> DdosintResult<String> {
        info!("Fetching targets for date: {}", date);
        let result = self.client.extract_by_date(date).await?;

        if result.targets().is_empty() {
            return Err(DdosintError::NoData(format!("No targets found for date {}", date)));
        }

        let exporter = self.exporter(output_dir);
        if stdout {
            return exporter.render(&result, format);
        }

        let prefix = prefix.unwrap_or(&self.config.export.prefix);
        let suffix = export::date_suffix(&result);
        let path = exporter.export(&result, format, prefix, &suffix).await?;

        Ok(display::extract_summary(date, &result, format, &path))
    }

    async fn handle_search(
        &self,
        host: &str,
        limit: Option<usize>,
        export: bool,
        format: ExportFormat,
        output_dir: Option<&Path>,
        stdout: bool,
    ) -> DdosintResult<String> {
        info!("Searching for host: {}", host);
        let result = self.client.search_by_host(host, limit).await?;
        let exporter = self.exporter(output_dir);

        if stdout {
            return exporter.render(&result, format);
        }

        let mut out = display::search_summary(&result, limit);
        if export {
            let suffix = export::sanitize_component(host);
            let path = exporter.export(&result, format, "search", &suffix).await?;
            out.push_str(&format!("\n✓ Exported to: {}\n", path.display()));
        }
        Ok(out)
    }

    async fn handle_stats(&self, kind: &str, export: bool, output_dir: Option<&Path>) -> DdosintResult<String> {
        let report = self.client.get_stats(kind).await?;
        // get_stats already rejected unknown kinds
        let kind: StatKind = kind.parse()?;

        let mut out = display::stats_report(kind, &report);
        if export {
            let path = self.exporter(output_dir)
                .write_json(&report, &format!("stats_{}", kind))
                .await?;
            out.push_str(&format!("\n✓ Exported to: {}\n", path.display()));
        }
        Ok(out)
    }

    async fn handle_dates(&self, limit: Option<usize>) -> DdosintResult<String> {
        let dates = self.client.list_dates(limit).await?;
        debug!("Received {} dates", dates.len());
        Ok(display::dates_table(&dates, limit))
    }

    async fn handle_recent(
        &self,
        limit: Option<usize>,
        export: bool,
        format: ExportFormat,
        output_dir: Option<&Path>,
    ) -> DdosintResult<String> {
        let result: QueryResult = self.client.recent_targets(limit).await?;

        let mut out = format!("\nRecent targets: {}\n", result.count());
        out.push_str(&display::target_listing(&result, result.targets().len()));

        if export {
            let path = self.exporter(output_dir)
                .export(&result, format, "recent", &export::today())
                .await?;
            out.push_str(&format!("\n✓ Exported to: {}\n", path.display()));
        }
        Ok(out)
    }
}

/// Resolve a leading `~` against the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

/// Entry point shared by the binary: load configuration, then dispatch
pub async fn run(args: Args) -> DdosintResult<()> {
    let config = Config::load(args.config.as_deref())?
        .with_overrides(args.base_url.clone(), args.timeout);
    debug!("Using API at {}", config.api.base_url);

    let command = match &args.command {
        Some(command) => command,
        None => {
            return Err(DdosintError::InvalidInput(
                "No command specified. Use --help for available commands.".to_string()
            ));
        }
    };

    if let Commands::Config { subcommand } = command {
        return handle_config_command(subcommand, &config, args.config.as_deref());
    }

    let app = App::from_config(config)?;
    app.run_command(command).await
}

fn handle_config_command(subcommand: &ConfigSubcommand, config: &Config, path: Option<&Path>) -> DdosintResult<()> {
    match subcommand {
        ConfigSubcommand::Init { force } => {
            let config_path = Config::init(path, *force)?;
            println!("Configuration initialized at {}", config_path.display());
            Ok(())
        },
        ConfigSubcommand::Show => {
            print!("{}", config.to_toml()?);
            Ok(())
        },
    }
}
