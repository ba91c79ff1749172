//! credit-calculator: balances and payment schedules for fixed-rate credits
//!
//! credits are read from a TOML file (`~/.credits.toml` by default) and
//! summarized as of today or as of `--date`.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use credit_calculator::config::CreditsConfig;
use credit_calculator::date::{local_today, parse_date};
use credit_calculator::errors::Result;
use credit_calculator::report::{render_json, render_report, ReportOptions};
use credit_calculator::{SafeTimeProvider, TimeSource};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CONFIG: &str = "~/.credits.toml";

/// Credit calculator
#[derive(Parser, Debug)]
#[command(name = "credit-calculator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Credits file path
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: String,

    /// Show all credits, including closed ones
    #[arg(short, long)]
    all: bool,

    /// Show the payment schedule of every credit
    #[arg(short, long)]
    schedule: bool,

    /// Report date (DD.MM.YYYY), defaults to today
    #[arg(short, long, value_parser = parse_date_arg)]
    date: Option<NaiveDate>,

    /// Print credits as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_date_arg(value: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

/// expand a leading `~` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(rest.trim_start_matches('/')),
            None => PathBuf::from(path),
        },
        _ => PathBuf::from(path),
    }
}

fn run(cli: &Cli) -> Result<String> {
    let path = expand_home(&cli.config);
    let config = CreditsConfig::load(&path)?;

    let info_date = match cli.date {
        Some(date) => date,
        None => local_today(&SafeTimeProvider::new(TimeSource::System)),
    };
    debug!(%info_date, credits = config.credits.len(), "building report");

    if cli.json {
        return render_json(&config.credits, info_date, cli.all);
    }

    let options = ReportOptions {
        show_all: cli.all,
        with_schedule: cli.schedule,
    };
    render_report(&config.credits, info_date, options)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    match run(&cli) {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
