// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load + validate the JSON config (once; the crawler only reads it)
// 3. Run the crawl, racing it against Ctrl-C / SIGTERM
// 4. Whatever happened, write the (possibly partial) HTML report
// 5. Exit with proper code:
//      0   = every checked link is fine
//      1   = broken or failed links found
//      2   = config error or the crawl was aborted
//      130 = interrupted
// =============================================================================

mod checker;
mod cli;
mod config;
mod crawl;
mod error;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, Overrides};
use config::Config;
use crawl::Crawler;
use report::{Aggregator, LinkOutcome, Report};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so `--json` output on stdout stays machine-readable.
// RUST_LOG overrides the level picked here.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},hyper=warn,reqwest=warn,html5ever=warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Crawl {
            config,
            start_url,
            max_depth,
            output,
            check_external,
            json,
        } => {
            let overrides = Overrides {
                start_url,
                max_depth,
                output,
                check_external,
            };
            let config = load_config(&config.config, overrides)?;
            handle_crawl(config, json).await
        }
        Commands::Validate { config } => handle_validate(&config.config),
    }
}

// A missing config file is fine when --start-url is given: defaults fill the rest
fn load_config(path: &Path, overrides: Overrides) -> Result<Config> {
    let mut config = match &overrides.start_url {
        Some(start_url) if !path.exists() => Config::new(start_url.clone()),
        _ => Config::load(path)
            .with_context(|| format!("could not load config from {}", path.display()))?,
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn handle_validate(path: &Path) -> Result<i32> {
    let config = load_config(path, Overrides::default())?;
    println!("✅ {} is valid", path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(0)
}

// How the crawl ended
enum CrawlEnd {
    Finished(crate::error::Result<Report>),
    Interrupted(&'static str),
}

async fn handle_crawl(config: Config, json: bool) -> Result<i32> {
    let probe = checker::ReqwestProbe::new(&config).context("could not build HTTP client")?;

    // main keeps its own handle so the report survives an abort or a signal
    let aggregator = Aggregator::new();
    let mut crawler = Crawler::new(config.clone(), probe, aggregator.clone())?;

    let end = tokio::select! {
        result = crawler.run() => CrawlEnd::Finished(result),
        signal = shutdown_signal() => CrawlEnd::Interrupted(signal),
    };

    let report = aggregator.snapshot();
    info!(pages = crawler.pages_visited(), links = report.total(), "Crawled");

    let exit_code = match &end {
        CrawlEnd::Finished(Ok(_)) if report.has_problems() => 1,
        CrawlEnd::Finished(Ok(_)) => 0,
        CrawlEnd::Finished(Err(e)) => {
            error!("Crawl failed: {}", e);
            warn!("Generating partial report...");
            2
        }
        CrawlEnd::Interrupted(signal) => {
            warn!("Scan {}. Generating partial report...", signal);
            EXIT_INTERRUPTED
        }
    };

    save_report(&config.output_file, &report);
    print_results(&report, json)?;

    Ok(exit_code)
}

// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No handler could be installed; never resolve
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "interrupted",
        _ = terminate => "terminated",
    }
}

// A report that can't be written shouldn't hide the results on screen
fn save_report(path: &Path, report: &Report) {
    match report::write_report(path, report) {
        Ok(()) => info!("Report saved to {}", path.display()),
        Err(e) => error!("Failed to save report to {}: {}", path.display(), e),
    }
}

// Prints the results either as a table or JSON
fn print_results(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_table(report);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(report: &Report) {
    println!("{:<60} {:<15} {:<30}", "URL", "STATUS", "SOURCE");
    println!("{}", "=".repeat(105));

    for outcome in report.iter() {
        println!(
            "{:<60} {:<15} {:<30}",
            truncate(outcome.url(), 57),
            format_status(outcome),
            truncate(outcome.source(), 27)
        );
    }

    println!();
    println!("📊 Crawl Summary:");
    println!("   ✅ OK:     {}", report.ok.len());
    println!("   ❌ Broken: {}", report.broken.len());
    println!("   ⚠️  Failed: {}", report.failed.len());
    println!("   📋 Total:  {}", report.total());
}

fn format_status(outcome: &LinkOutcome) -> String {
    match (outcome, outcome.status()) {
        (LinkOutcome::Broken { .. }, Some(status)) => format!("❌ {}", status),
        (_, Some(status)) => format!("✅ {}", status),
        (_, None) => "⚠️  FAILED".to_string(),
    }
}

// Truncate long text for display, on a char boundary
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
