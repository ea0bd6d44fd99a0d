// src/lib.rs
//! jira-harvest library: harvests JIRA issues, their parent hierarchy and
//! their link graph into a single in-memory database.
//!
//! # Public API
//!
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `HarvestConfig`
//! - **Domain model**: `Issue`, `Comment`, `Link`, `Database`
//! - **Domain types**: `IssueId`, `BaseUrl`, `Credentials`
//! - **API client**: `IssueSource`, `JiraHttpClient`, `Tracker`
//! - **Output**: `write_database`

mod api;
mod config;
mod constants;
mod error;
mod model;
mod output;
mod types;

// --- Error Handling ---
pub use crate::error::AppError;
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, HarvestConfig};

// --- Domain Model ---
pub use crate::model::{Comment, Database, DatabaseSnapshot, DatabaseStats, Issue, Link};

// --- Domain Types ---
pub use crate::types::{ApiToken, BaseUrl, Credentials, IssueId};

// --- API Client ---
pub use crate::api::{
    links::{
        ingest_issue_link, reconcile_link_dates, LinkRegistry, PendingLinkDates,
        ReconcileSummary,
    },
    parser::{
        parse_issue, parse_jira_date, InwardSide, IssueLinkRecord, LinkEvidence, ParsedIssue,
    },
    responses::SearchResponse,
    HarvestPhase, HarvestReport, IssueSource, JiraHttpClient, SearchQuery, Tracker,
};

// --- Output ---
pub use crate::output::write_database;
