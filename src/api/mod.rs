// src/api/mod.rs
//! JIRA API interaction: fetching search pages and turning them into a
//! database of issues, parents and links.

pub mod client;
pub mod links;
mod offset_queue;
pub mod parser;
pub mod responses;
mod tracker;

use crate::constants::{SEARCH_EXPAND, SEARCH_FIELDS, SEARCH_JQL};
use crate::error::AppError;
use responses::SearchResponse;

/// The ability to run one page of the fixed issue search.
///
/// The tracker depends on this trait, never on HTTP details, so tests can
/// drive a harvest from an in-memory dataset.
#[async_trait::async_trait]
pub trait IssueSource: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, AppError>;
}

/// Parameters of one page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchQuery {
    pub start_at: u64,
    pub max_results: u32,
}

impl SearchQuery {
    pub fn new(start_at: u64, max_results: u32) -> Self {
        Self {
            start_at,
            max_results,
        }
    }

    /// Query-string parameters, in the order they are sent.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("jql", SEARCH_JQL.to_string()),
            ("startAt", self.start_at.to_string()),
            ("maxResults", self.max_results.to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
            ("expand", SEARCH_EXPAND.to_string()),
        ]
    }
}

// Re-export the public interface
pub use client::JiraHttpClient;
pub use tracker::{HarvestPhase, HarvestReport, Tracker};
