//! Sitecheck main entry point
//!
//! This is the command-line interface for the Sitecheck link checker.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sitecheck::config::{load_optional_config, Config};
use sitecheck::{HttpCrawler, Printer, PrinterOptions, Report};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Sitecheck: link reachability reports
///
/// Sitecheck walks every link reachable from the given entry pages and
/// prints, per site, each visited page with the status of every link on it.
#[derive(Parser, Debug)]
#[command(name = "sitecheck")]
#[command(version)]
#[command(about = "Check the reachability of every link on a site", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Percent-decode URLs in the output
    #[arg(long, global = true)]
    decode: bool,

    /// Do not print the error of failed links
    #[arg(long, global = true)]
    hide_error: bool,

    /// Do not print the redirect target of redirected links
    #[arg(long, global = true)]
    hide_redirect: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check every link reachable from the given entry URLs
    Urls {
        /// Entry URLs, one site each
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_settings(&cli).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })?;

    match &cli.command {
        Command::Urls { urls } => handle_urls(&config, urls)
            .await
            .context("Failed to write report"),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the report on stdout stays clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("sitecheck=info,warn"),
            2 => EnvFilter::new("sitecheck=debug,info"),
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

/// Loads the configuration file, if any, and applies flag overrides
fn load_settings(cli: &Cli) -> sitecheck::Result<Config> {
    let mut config = load_optional_config(cli.config.as_deref())?;
    apply_flags(&mut config, cli);
    Ok(config)
}

/// Command-line flags override the configuration file
///
/// Colors are also turned off when stdout is not a terminal or `NO_COLOR`
/// is set.
fn apply_flags(config: &mut Config, cli: &Cli) {
    let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    if cli.no_color || no_color_env || !std::io::stdout().is_terminal() {
        config.output.colorize = false;
    }
    if cli.decode {
        config.output.decode_urls = true;
    }
    if cli.hide_error {
        config.output.hide_error = true;
    }
    if cli.hide_redirect {
        config.output.hide_redirect = true;
    }
}

/// Crawls every entry URL and prints the report
async fn handle_urls(config: &Config, urls: &[String]) -> sitecheck::Result<()> {
    tracing::info!("Checking {} site(s)", urls.len());

    let crawler = Arc::new(HttpCrawler::new(config.crawler.clone()));
    let mut report = Report::new(Some(crawler))
        .with_event_buffer(config.crawler.event_buffer)
        .for_urls(urls.iter().cloned());
    report.fill().await;

    let mut printer = Printer::new(PrinterOptions::from(&config.output));
    printer.print(report.sites())?;

    let summary = report.summary();
    tracing::info!(
        "{} site(s), {} failed, {} page(s), {} link(s): {} ok, {} redirected, {} broken",
        summary.sites,
        summary.failed_sites,
        summary.pages,
        summary.links,
        summary.success,
        summary.warning,
        summary.danger
    );

    Ok(())
}
