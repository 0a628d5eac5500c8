//! Menu-Scanner main entry point
//!
//! This is the command-line interface for the navigation menu scanner.

use clap::Parser;
use menu_scanner::config::{load_config_with_hash, Config};
use menu_scanner::output::{write_json, ErrorResponse, ScanResponse};
use menu_scanner::request::ScanRequest;
use menu_scanner::{RequestShapeError, ScanError, ScanReport, Scanner};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Menu-Scanner: extract primary navigation menus from many sites
///
/// Addresses may be given as arguments, as a newline-separated file, or as a
/// JSON request document. Plain and Cyrillic domains are supported. The
/// result is written to stdout as JSON.
#[derive(Parser, Debug)]
#[command(name = "menu-scanner")]
#[command(version = "1.0.0")]
#[command(about = "Extract primary navigation menus from many sites", long_about = None)]
struct Cli {
    /// Addresses to scan (e.g. example.com, https://сайт.рф)
    #[arg(value_name = "ADDRESS")]
    addresses: Vec<String>,

    /// File with one address per line ('#' starts a comment)
    #[arg(short, long, value_name = "FILE", conflicts_with = "request")]
    input: Option<PathBuf>,

    /// JSON request document: {"urls": [...], "options": {...}}
    #[arg(long, value_name = "FILE", conflicts_with = "addresses")]
    request: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of sites fetched concurrently (1-10)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Per-attempt timeout in milliseconds (1000-30000)
    #[arg(long)]
    timeout: Option<u64>,

    /// Attempts per site (1-5)
    #[arg(long)]
    retries: Option<u32>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (written, code) = match run(&cli).await {
        Ok(report) => (
            write_json(
                std::io::stdout().lock(),
                &ScanResponse::from(report),
                cli.pretty,
            ),
            ExitCode::SUCCESS,
        ),
        Err(e) => {
            tracing::error!("Scan failed: {}", e);
            (
                write_json(
                    std::io::stdout().lock(),
                    &ErrorResponse::from_error(&e),
                    cli.pretty,
                ),
                ExitCode::FAILURE,
            )
        }
    };

    if let Err(e) = written {
        tracing::error!("Failed to write output: {}", e);
        return ExitCode::FAILURE;
    }

    code
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for the JSON response.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("menu_scanner=info,warn"),
            1 => EnvFilter::new("menu_scanner=debug,info"),
            2 => EnvFilter::new("menu_scanner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads configuration, builds the request and runs the scan
async fn run(cli: &Cli) -> Result<ScanReport, ScanError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_cli_overrides(cli, &mut config);

    let request = build_request(cli)?;
    config.scan = request.options_over(&config.scan);
    tracing::debug!("Effective options: {:?}", config.scan);

    let scanner = Scanner::from_config(&config)?;
    Ok(scanner.scan(&request.urls).await)
}

/// Command-line flags win over the configuration file
fn apply_cli_overrides(cli: &Cli, config: &mut Config) {
    if let Some(batch_size) = cli.batch_size {
        config.scan.batch_size = batch_size;
    }
    if let Some(timeout) = cli.timeout {
        config.scan.timeout_ms = timeout;
    }
    if let Some(retries) = cli.retries {
        config.scan.max_retries = retries;
    }
}

/// Builds the scan request from the JSON document or the address list
///
/// A JSON request is validated as a whole, like any transport request.
/// Plain address lists go straight to the scanner so that invalid entries
/// show up as per-site errors in the report.
fn build_request(cli: &Cli) -> Result<ScanRequest, ScanError> {
    if let Some(path) = &cli.request {
        let content = std::fs::read_to_string(path)?;
        return Ok(ScanRequest::from_json(&content)?);
    }

    let mut addresses = cli.addresses.clone();
    if let Some(path) = &cli.input {
        addresses.extend(read_address_file(path)?);
    }

    if addresses.is_empty() {
        return Err(RequestShapeError::NoAddresses.into());
    }

    Ok(ScanRequest::from_addresses(addresses))
}

/// Reads one address per line, skipping blanks and comments
fn read_address_file(path: &Path) -> Result<Vec<String>, ScanError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_address_lines(&content))
}

fn parse_address_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
