//! tctop - Bandwidth monitor for tc class hierarchies
//!
//! Samples the class counters of one interface twice and prints a ranked
//! table or an indented class tree.

use std::time::Duration;

use clap::{CommandFactory, Parser};
use tctop::output::OutputFormat;
use tctop::parse::parse_rate;
use tctop::{Limit, Metric, Mode, Monitor, ReportConfig, Result, TcCommand};

#[derive(Parser)]
#[command(name = "tctop")]
#[command(about = "Bandwidth monitor for tc class hierarchies", long_about = None)]
#[command(version)]
struct Cli {
    /// Interface to monitor
    #[arg(short = 'i', long)]
    interface: Option<String>,

    /// Show the class tree instead of a ranked table
    #[arg(short = 't', long)]
    tree: bool,

    /// Seconds between the two samples
    #[arg(short = 'I', long, default_value = "3", value_parser = parse_interval)]
    interval: Duration,

    /// Rows to show in the ranked table (-1 for all)
    #[arg(
        short = 'n',
        long,
        default_value = "20",
        allow_negative_numbers = true,
        value_parser = parse_limit
    )]
    num: Limit,

    /// Sort metric
    #[arg(short = 's', long, default_value = "rateBytesPerSec", value_parser = parse_metric)]
    sort: Metric,

    /// Reference link capacity (e.g. 200Mbit, 1Gbit)
    #[arg(short = 'c', long, default_value = "200Mbit", value_parser = parse_capacity)]
    capacity: u64,

    /// Output JSON
    #[arg(short = 'j', long)]
    json: bool,

    /// Pretty print JSON
    #[arg(short = 'p', long)]
    pretty: bool,

    /// tc binary to run
    #[arg(long = "tc", default_value = TcCommand::DEFAULT_PROGRAM)]
    tc: String,

    /// Log debug output to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn parse_interval(s: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("invalid interval: {}", s))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("interval must be positive: {}", s));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}

fn parse_limit(s: &str) -> std::result::Result<Limit, String> {
    s.parse().map_err(|e: tctop::Error| e.to_string())
}

fn parse_metric(s: &str) -> std::result::Result<Metric, String> {
    s.parse().map_err(|e: tctop::Error| e.to_string())
}

fn parse_capacity(s: &str) -> std::result::Result<u64, String> {
    parse_rate(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(interface) = cli.interface else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = ReportConfig {
        interval: cli.interval,
        limit: cli.num,
        capacity_bps: cli.capacity,
        metric: cli.sort,
        mode: if cli.tree { Mode::Tree } else { Mode::Flat },
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        },
        pretty: cli.pretty,
    };

    let monitor = Monitor::new(TcCommand::new(interface).program(cli.tc));
    match monitor.report(&config).await {
        Ok(report) => print!("{}", report),
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_not_found() {
                eprintln!("hint: check that tc is installed (see --tc) and the interface exists");
            } else if e.is_permission_denied() {
                eprintln!("hint: permission denied, try running as root");
            }
            std::process::exit(1);
        }
    }

    Ok(())
}
