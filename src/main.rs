// pie-chart - number formatting and data fetching for pie-chart widgets
//
// Architecture:
// - format: magnitude / pattern / precision formatters for labels
// - fetch:  one GET per chart, degrading to empty rows on any failure
// - chart:  widget config types and slice assembly
// - cli:    subcommands exercising the above

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use pie_chart::config::Config;
use pie_chart::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management runs before the config is loaded so a broken file
    // can still be located and reset
    if let Commands::Config { show, reset, path } = cli.command {
        return cli::handle_config(show, reset, path);
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env()?;

    // The guard must be kept alive for the duration of the program to ensure logs flush
    let _file_guard = logging::init(&config.logging);

    tracing::debug!(api_base = ?config.api_base, "Configuration loaded");

    match cli.command {
        Commands::Format {
            value,
            format,
            decimals,
            percent,
            separators,
        } => {
            println!(
                "{}",
                cli::handle_format(&value, format, decimals, percent, separators)
            );
            Ok(())
        }
        Commands::Fetch {
            source,
            query_id,
            endpoint,
        } => cli::handle_fetch(&config, source, query_id, endpoint).await,
        Commands::Render { path } => cli::handle_render(&config, &path).await,
        Commands::Config { .. } => Ok(()),
    }
}
