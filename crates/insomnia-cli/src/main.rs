use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use insomnia_core::{AppConfig, ConfigError};
use tracing_subscriber::EnvFilter;

mod harvest;
mod output;

use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "insomnia")]
#[command(about = "Harvest Insomnia Cookies store locations as point-of-interest records")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the store locator once per region and write one record per store.
    Harvest {
        /// Restrict the run to this region code; repeat for several. Defaults to all.
        #[arg(long = "state", value_name = "CODE")]
        states: Vec<String>,
        /// Write records to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Geojson)]
        format: OutputFormat,
        /// Print the regions that would be searched, without any requests.
        #[arg(long)]
        dry_run: bool,
    },
    /// List the region codes searched by `harvest`.
    Regions,
    /// Print the effective configuration.
    Config,
}

/// Log level used when configuration fails to load.
const FALLBACK_LOG_LEVEL: &str = "info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = insomnia_core::load_app_config();

    let log_level = config
        .as_ref()
        .map_or(FALLBACK_LOG_LEVEL, |config| config.log_level.as_str());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    run(cli.command, config).await
}

/// Dispatch a parsed command. Only commands that read configuration surface
/// a configuration error.
async fn run(
    command: Option<Commands>,
    config: Result<AppConfig, ConfigError>,
) -> anyhow::Result<()> {
    match command {
        Some(Commands::Harvest {
            states,
            output,
            format,
            dry_run,
        }) => {
            let config = config.context("failed to load configuration")?;
            harvest::run_harvest(&config, &states, output.as_deref(), format, dry_run).await?;
        }
        Some(Commands::Regions) => {
            for code in insomnia_core::REGION_CODES {
                println!("{code}");
            }
        }
        Some(Commands::Config) => {
            let config = config.context("failed to load configuration")?;
            println!("{config:#?}");
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}
