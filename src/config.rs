// src/config.rs
use crate::constants::{INITIAL_PAGE_SIZE, MAX_CONCURRENCY};
use crate::error::AppError;
use crate::types::{BaseUrl, Credentials, ValidationError};
use clap::Parser;
use std::path::PathBuf;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Base JIRA URL
    #[arg(long, default_value = "https://issues.apache.org/jira")]
    pub url: String,

    /// Number of concurrent page fetches
    #[arg(short = 'n', long, default_value_t = 1)]
    pub concurrency: usize,

    /// Output file for the harvested database (JSON)
    #[arg(short, long, default_value = "apache.json")]
    pub output: String,

    /// Results requested per page; the server may honor fewer
    #[arg(long, default_value_t = INITIAL_PAGE_SIZE)]
    pub page_size: u32,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Do not print the end-of-run statistics
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

/// Resolved harvest configuration, validated and ready to run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub base_url: BaseUrl,
    pub credentials: Option<Credentials>,
    pub concurrency: usize,
    pub page_size: u32,
    pub output_file: PathBuf,
    pub verbose: bool,
    pub quiet: bool,
}

impl HarvestConfig {
    /// Resolves a complete configuration from CLI input and environment.
    ///
    /// Credentials come from `JIRA_USER` and `JIRA_API_TOKEN`; both unset
    /// means anonymous access.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let credentials = Credentials::from_parts(
            std::env::var("JIRA_USER").ok(),
            std::env::var("JIRA_API_TOKEN").ok(),
        )?;
        Self::from_parts(cli, credentials)
    }

    /// Validates CLI input against already-resolved credentials.
    pub fn from_parts(
        cli: CommandLineInput,
        credentials: Option<Credentials>,
    ) -> Result<Self, AppError> {
        let base_url = BaseUrl::parse(&cli.url)?;

        if cli.concurrency == 0 || cli.concurrency > MAX_CONCURRENCY {
            return Err(ValidationError::OutOfBounds {
                value: cli.concurrency as u64,
                min: 1,
                max: MAX_CONCURRENCY as u64,
            }
            .into());
        }

        if cli.page_size == 0 {
            return Err(ValidationError::OutOfBounds {
                value: 0,
                min: 1,
                max: u64::from(u32::MAX),
            }
            .into());
        }

        if cli.output.trim().is_empty() {
            return Err(AppError::MissingConfiguration(
                "output file path is empty".to_string(),
            ));
        }

        Ok(HarvestConfig {
            base_url,
            credentials,
            concurrency: cli.concurrency,
            page_size: cli.page_size,
            output_file: PathBuf::from(cli.output),
            verbose: cli.verbose,
            quiet: cli.quiet,
        })
    }
}
