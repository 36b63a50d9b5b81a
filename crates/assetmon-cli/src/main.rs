//! assetmon - asset monitoring CLI entry point.

use anyhow::Result;
use assetmon_cli::{AppConfig, AppError, Application, TableQuery};
use assetmon_client::ClientError;
use assetmon_core::AssetField;
use assetmon_table::{SortDirection, StatusFilter};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Asset monitoring dashboard for the terminal
#[derive(Parser, Debug)]
#[command(name = "assetmon", version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via ASSETMON_CONFIG env var)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Print Prometheus metrics to stderr when the command finishes
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List assets with search, status filter, sort and paging
    Assets {
        /// Free-text search over name, type, location, status and id
        #[arg(short, long)]
        query: Option<String>,
        /// Status tab ("all" or a status)
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,
        /// Sort column (id, name, type, location, status, last_updated)
        #[arg(long, default_value = "name")]
        sort: AssetField,
        /// Sort direction (asc or desc)
        #[arg(short, long, default_value = "asc")]
        direction: SortDirection,
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show one asset with its latest reading
    Asset { id: String },
    /// Follow live telemetry for an asset until Ctrl-C
    Watch { id: String },
    /// Periodically refresh the fleet overview
    Dashboard {
        /// Asset to chart instead of the first by name
        #[arg(long)]
        select: Option<String>,
        /// Refresh once and exit
        #[arg(long)]
        once: bool,
    },
    /// Read or save asset configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Show the saved configuration (or the defaults) for an asset
    Get { id: String },
    /// List all saved configurations
    List,
    /// Save a configuration from a JSON file
    Save { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    assetmon_telemetry::init_logging()?;
    info!("Starting assetmon v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(args.config.as_deref())?;
    info!(api = %config.api.base_url, "Configuration loaded");

    let app = Application::new(config)?;
    match run(&app, args.command).await {
        Err(AppError::Client(ClientError::Validation(messages))) => {
            eprintln!("Configuration rejected:");
            for message in &messages {
                eprintln!("  - {message}");
            }
            std::process::exit(2);
        }
        result => result?,
    }

    if args.metrics {
        eprint!("{}", assetmon_telemetry::gather_text()?);
    }

    Ok(())
}

async fn run(app: &Application, command: Command) -> Result<(), AppError> {
    match command {
        Command::Assets {
            query,
            status,
            sort,
            direction,
            page,
        } => {
            let query = TableQuery {
                query,
                status,
                sort,
                direction,
                page,
            };
            print!("{}", app.list_assets(&query).await?);
        }
        Command::Asset { id } => print!("{}", app.show_asset(&id).await?),
        Command::Watch { id } => app.watch(&id).await?,
        Command::Dashboard { select, once } => {
            if once {
                print!("{}", app.dashboard_once(select.as_deref()).await?);
            } else {
                app.run_dashboard(select.as_deref()).await?;
            }
        }
        Command::Config(ConfigCommand::Get { id }) => print!("{}", app.config_get(&id).await?),
        Command::Config(ConfigCommand::List) => print!("{}", app.config_list().await?),
        Command::Config(ConfigCommand::Save { file }) => {
            print!("{}", app.config_save(&file).await?)
        }
    }
    Ok(())
}
