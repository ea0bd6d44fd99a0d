// src/model/mod.rs
//! Domain model: issues, their comments, typed links, and the database
//! that accumulates them during a harvest.

mod database;

pub use database::{Database, DatabaseSnapshot, DatabaseStats};

use crate::types::IssueId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An issue as harvested from the tracker.
///
/// Field names serialize in PascalCase so the output artifact reads
/// `{"Id": ..., "Title": ..., "Name": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Issue {
    pub id: IssueId,
    pub title: String,
    /// Human-readable key, e.g. `"YARN-499"`.
    pub name: String,
    pub body: String,
    pub created: Option<DateTime<Utc>>,
    /// In the order the API returned them, which is chronological.
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Comment {
    pub author_name: String,
    pub author_email: String,
    pub created: Option<DateTime<Utc>>,
    pub body: String,
}

/// A directed, typed relationship between two issues.
///
/// `created` stays `None` until link-date reconciliation finds a matching
/// changelog entry. Self-loops (`from == to`) are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Link {
    pub from: IssueId,
    pub to: IssueId,
    #[serde(rename = "Type")]
    pub link_type: String,
    pub created: Option<DateTime<Utc>>,
}

impl Link {
    pub fn new(from: IssueId, to: IssueId, link_type: impl Into<String>) -> Self {
        Self {
            from,
            to,
            link_type: link_type.into(),
            created: None,
        }
    }
}

/// Shortens potentially large text for log output.
fn trim(s: &str, length: usize) -> String {
    if s.chars().count() > length {
        let kept: String = s.chars().take(length.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Issue[Id={}, Key={}, Title={}, Body={}, Comments={}]",
            self.id,
            self.name,
            trim(&self.title, 30),
            trim(&self.body, 30),
            self.comments.len()
        )
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} <{}> {}]",
            self.author_name,
            self.author_email,
            trim(&self.body, 30)
        )
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.from, self.link_type, self.to)
    }
}
