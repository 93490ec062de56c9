// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - format: format one number the way chart labels do
// - fetch:  fetch rows from a data source and print them as JSON
// - render: load a chart config, fetch its rows, print the slices
// - config: show, locate, or reset the config file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pie_chart::chart::{build_slices, PieChartConfig};
use pie_chart::config::{Config, VERSION};
use pie_chart::fetch::{DataSource, FetchOptions, Fetcher};
use pie_chart::format::{format_number, format_number_by_format, FormatOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Number formatting and data fetching for pie-chart widgets
#[derive(Parser)]
#[command(name = "pie-chart")]
#[command(version = VERSION)]
#[command(about = "Number formatting and data fetching for pie-chart widgets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Format a number like a chart label
    Format {
        /// Value to format ("null" renders as "-")
        #[arg(allow_negative_numbers = true)]
        value: String,

        /// Format specifier, e.g. "$0.00", "0.0%", "0.0a"
        #[arg(long)]
        format: Option<String>,

        /// Decimal places for K/M/B values
        #[arg(long)]
        decimals: Option<u32>,

        /// Value is already a percentage
        #[arg(long)]
        percent: bool,

        /// Always use full grouping, never abbreviate (needs --format)
        #[arg(long, requires = "format", conflicts_with = "percent")]
        separators: bool,
    },

    /// Fetch rows from a data source
    Fetch {
        /// Data source: dune or custom
        #[arg(long)]
        source: Option<String>,

        /// Query id for the dune source
        #[arg(long)]
        query_id: Option<String>,

        /// Endpoint for the custom source
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Fetch a chart's rows and print its slices
    Render {
        /// Chart config file (.json or .toml)
        path: PathBuf,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Parse a CLI value; anything that isn't a number formats like NaN
fn parse_value(raw: &str) -> Option<f64> {
    if raw.eq_ignore_ascii_case("null") {
        return None;
    }
    Some(raw.trim().parse().unwrap_or(f64::NAN))
}

pub fn handle_format(
    value: &str,
    format: Option<String>,
    decimals: Option<u32>,
    percent: bool,
    separators: bool,
) -> String {
    let value = parse_value(value);

    match (value, format) {
        (Some(num), Some(format)) if separators => {
            format_number_by_format(num, &format, true)
        }
        (value, format) => format_number(
            value,
            &FormatOptions {
                decimals,
                format,
                percent_values: percent,
            },
        ),
    }
}

pub async fn handle_fetch(
    config: &Config,
    source: Option<String>,
    query_id: Option<String>,
    endpoint: Option<String>,
) -> Result<()> {
    let fetcher = Fetcher::from_config(config)?;
    let options = FetchOptions {
        data_source: source.as_deref().map(DataSource::parse),
        query_id,
        api_endpoint: endpoint,
    };

    let outcome = fetcher.fetch(&options).await;
    if let Some(reason) = outcome.degrade_reason() {
        eprintln!("No rows: {}", reason);
    }

    let rows = outcome.into_rows();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

pub async fn handle_render(config: &Config, path: &Path) -> Result<()> {
    let chart = PieChartConfig::load(path)?;
    let fetcher = Fetcher::from_config(config)?;

    if let Some(file) = chart.snapshot_file() {
        tracing::info!(
            cid = file.cid.as_deref().unwrap_or("-"),
            "Snapshot chart; fetching live rows instead of the stored file"
        );
    }

    let rows = fetcher.call_api(&chart.fetch_options()).await;
    let slices = build_slices(&rows, &chart.options);

    println!("{}", chart.title);
    if let Some(description) = &chart.description {
        println!("{}", description);
    }
    println!();

    if slices.is_empty() {
        println!("(no data)");
        return Ok(());
    }

    let width = slices.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);
    for slice in &slices {
        let color = slice.color.as_deref().unwrap_or("");
        println!(
            "{:<width$}  {:>12}  {:>8}  {}",
            slice.name,
            slice.label,
            slice.share_label(),
            color,
            width = width
        );
    }
    Ok(())
}

pub fn handle_config(show: bool, reset: bool, path: bool) -> Result<()> {
    if path {
        handle_config_path()
    } else if show {
        handle_config_show()
    } else if reset {
        handle_config_reset()
    } else {
        // No flag provided, show help
        println!("Usage: pie-chart config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
        Ok(())
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::from_env()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating directory {}", parent.display()))?;
    }

    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Error writing config {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("null"), None);
        assert_eq!(parse_value("-12.5"), Some(-12.5));
        assert!(parse_value("abc").is_some_and(f64::is_nan));
    }

    #[test]
    fn test_handle_format() {
        assert_eq!(handle_format("1234.5", None, None, false, false), "1.235K");
        assert_eq!(handle_format("1234.5", Some("$0.00".into()), None, false, false), "$1,234.50");
        assert_eq!(handle_format("1234567", Some("0a".into()), None, false, true), "1,234,567");
        assert_eq!(handle_format("12.345", None, None, true, false), "12.35%");
        assert_eq!(handle_format("NULL", None, None, false, false), "-");
        assert_eq!(handle_format("oops", None, None, false, false), "0");
    }

    #[test]
    fn test_cli_parses_negative_values() {
        let cli = Cli::try_parse_from(["pie-chart", "format", "-1500000", "--decimals", "1"]).unwrap();
        match cli.command {
            Commands::Format { value, decimals, .. } => {
                assert_eq!(value, "-1500000");
                assert_eq!(decimals, Some(1));
            }
            _ => panic!("expected format command"),
        }
    }

    #[test]
    fn test_separators_requires_format() {
        assert!(Cli::try_parse_from(["pie-chart", "format", "1", "--separators"]).is_err());
    }

    #[test]
    fn test_separators_conflicts_with_percent() {
        let args = ["pie-chart", "format", "1", "--format", "0a", "--separators", "--percent"];
        assert!(Cli::try_parse_from(args).is_err());

        let args = ["pie-chart", "format", "1", "--format", "0a", "--separators"];
        assert!(Cli::try_parse_from(args).is_ok());
    }
}
