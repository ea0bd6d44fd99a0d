// src/model/database.rs
//! Concurrency-safe accumulation point for everything a harvest discovers.
//!
//! Three independent collections, each behind its own lock:
//!   - `issues`: id → issue, last write wins
//!   - `tree`:   child id → parent id, last write wins, no cycle check
//!   - `graph`:  source id → outgoing links in discovery order
//!
//! Critical sections are a single insert or append so page workers only
//! contend on the collection they are actually touching.

use super::{Issue, Link};
use crate::types::IssueId;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Issues, parent tree and link graph discovered so far. Safe to share
/// between page workers.
#[derive(Debug, Default)]
pub struct Database {
    issues: Mutex<HashMap<IssueId, Issue>>,
    tree: Mutex<HashMap<IssueId, IssueId>>,
    graph: Mutex<HashMap<IssueId, Vec<Link>>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts an issue by id.
    pub fn add_issue(&self, issue: Issue) {
        self.issues.lock().insert(issue.id.clone(), issue);
    }

    /// Records `parent` as the parent of `child`, replacing any earlier entry.
    pub fn set_parent(&self, child: IssueId, parent: IssueId) {
        self.tree.lock().insert(child, parent);
    }

    /// Appends a link to its source's outgoing edges.
    ///
    /// No uniqueness check happens here; callers dedupe by remote link id.
    pub fn add_link(&self, link: Link) {
        self.graph
            .lock()
            .entry(link.from.clone())
            .or_default()
            .push(link);
    }

    /// Number of issues stored so far. May race with concurrent writers.
    pub fn issue_count(&self) -> usize {
        self.issues.lock().len()
    }

    pub fn issue(&self, id: &IssueId) -> Option<Issue> {
        self.issues.lock().get(id).cloned()
    }

    pub fn parent_of(&self, child: &IssueId) -> Option<IssueId> {
        self.tree.lock().get(child).cloned()
    }

    /// Outgoing links of `source` in discovery order.
    pub fn links_from(&self, source: &IssueId) -> Vec<Link> {
        self.graph.lock().get(source).cloned().unwrap_or_default()
    }

    /// Id → key lookup over every issue currently known.
    pub fn issue_keys(&self) -> HashMap<IssueId, String> {
        self.issues
            .lock()
            .iter()
            .map(|(id, issue)| (id.clone(), issue.name.clone()))
            .collect()
    }

    /// Stamps creation dates onto the outgoing links of `source`.
    ///
    /// `resolve` is asked for every link of `source`; links it answers
    /// `Some` for get their `created` overwritten. Returns how many links
    /// were stamped.
    pub fn resolve_link_dates<F>(&self, source: &IssueId, mut resolve: F) -> usize
    where
        F: FnMut(&Link) -> Option<DateTime<Utc>>,
    {
        let mut graph = self.graph.lock();
        let Some(links) = graph.get_mut(source) else {
            return 0;
        };

        let mut stamped = 0;
        for link in links.iter_mut() {
            if let Some(date) = resolve(link) {
                link.created = Some(date);
                stamped += 1;
            }
        }
        stamped
    }

    /// Counts used for the end-of-run summary.
    pub fn stats(&self) -> DatabaseStats {
        let issues = self.issues.lock().len();
        let parent_links = self.tree.lock().len();
        let graph = self.graph.lock();
        DatabaseStats {
            issues,
            parent_links,
            link_sources: graph.len(),
            links: graph.values().map(Vec::len).sum(),
        }
    }

    /// Owned, ordered copy of all three collections for serialization.
    pub fn snapshot(&self) -> DatabaseSnapshot {
        DatabaseSnapshot {
            issues: self
                .issues
                .lock()
                .iter()
                .map(|(id, issue)| (id.clone(), issue.clone()))
                .collect(),
            tree: self
                .tree
                .lock()
                .iter()
                .map(|(child, parent)| (child.clone(), parent.clone()))
                .collect(),
            graph: self
                .graph
                .lock()
                .iter()
                .map(|(source, links)| (source.clone(), links.clone()))
                .collect(),
        }
    }
}

/// Sizes of the database collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseStats {
    pub issues: usize,
    pub parent_links: usize,
    /// Issues with at least one outgoing link.
    pub link_sources: usize,
    pub links: usize,
}

/// The output artifact: `{"Issues": {...}, "Tree": {...}, "Graph": {...}}`.
///
/// Sorted maps keep the written file stable between runs over the same data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatabaseSnapshot {
    pub issues: BTreeMap<IssueId, Issue>,
    pub tree: BTreeMap<IssueId, IssueId>,
    pub graph: BTreeMap<IssueId, Vec<Link>>,
}
