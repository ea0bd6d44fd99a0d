// src/main.rs

use clap::Parser;
use jira_harvest::{
    write_database, AppError, CommandLineInput, HarvestConfig, HarvestReport, JiraHttpClient,
    Tracker,
};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;
use std::sync::Arc;
use std::time::Instant;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("jira_harvest.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Harvests the configured instance and writes the database to disk.
async fn execute_harvest(config: &HarvestConfig) -> Result<(), AppError> {
    let start_time = Instant::now();
    log::info!(
        "Harvesting {} with {} concurrent fetches",
        config.base_url,
        config.concurrency
    );

    let client = JiraHttpClient::new(config.base_url.clone(), config.credentials.clone())?;
    let mut tracker = Tracker::with_page_size(Arc::new(client), config.page_size);
    let report = tracker.fetch_all(config.concurrency).await?;
    let db = tracker.database();

    if !config.quiet {
        let stats = db.stats();
        println!(
            "{} issues, {} parent links, {} general links",
            stats.issues, stats.parent_links, stats.link_sources
        );
        report_gaps(&report);
    }

    write_database(&config.output_file, &db.snapshot())?;

    if !config.quiet {
        println!("run took {:?}", start_time.elapsed());
    }
    Ok(())
}

/// Warns about pages that could not be fetched.
fn report_gaps(report: &HarvestReport) {
    if report.is_complete() {
        return;
    }
    if !report.failed_offsets.is_empty() {
        eprintln!(
            "⚠️  {} of {} pages failed (offsets {:?}); the database is incomplete.",
            report.failed_offsets.len(),
            report.pages_fetched + report.failed_offsets.len(),
            report.failed_offsets
        );
    }
    if report.crashed_workers > 0 {
        eprintln!(
            "⚠️  {} page worker(s) crashed; see the log for details.",
            report.crashed_workers
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = HarvestConfig::resolve(cli)?;

    execute_harvest(&config).await?;

    Ok(())
}
