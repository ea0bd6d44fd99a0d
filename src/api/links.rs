// src/api/links.rs
//! Issue-link deduplication and creation-date reconciliation.
//!
//! JIRA reports each link on both of its endpoints, under the same link id.
//! Only the inward side is recorded, once per link id. Creation dates are
//! not part of the link record at all; they are recovered from the source
//! issue's changelog, which names the target by key rather than id, and
//! stamped onto the graph once every page has been fetched.

use super::parser::{IssueLinkRecord, LinkEvidence};
use crate::model::{Database, Link};
use crate::types::IssueId;
use chrono::{DateTime, Utc};
use dashmap::DashSet;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Set of remote link ids already ingested during one harvest.
#[derive(Debug, Default)]
pub struct LinkRegistry {
    seen: DashSet<String>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, link_id: &str) -> bool {
        self.seen.contains(link_id)
    }

    /// Marks `link_id` as seen, returning `true` if it was not seen before.
    pub fn mark(&self, link_id: &str) -> bool {
        self.seen.insert(link_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Ingests one `issuelinks` entry found on issue `from`.
///
/// Returns `true` when a link was added to the graph. Only the inward side
/// is recorded, and only the first time its link id is seen. An entry
/// without an inward side is left for the other endpoint to report, so that
/// edge stays missing if the other endpoint is never harvested.
pub fn ingest_issue_link(
    db: &Database,
    registry: &LinkRegistry,
    from: &IssueId,
    record: IssueLinkRecord,
) -> bool {
    let Some(inward) = record.inward else {
        return false;
    };

    // Check-and-mark is one atomic insert so two workers that see the same
    // link id cannot both record it.
    if !registry.mark(&record.link_id) {
        return false;
    }

    let link = Link::new(from.clone(), inward.other, inward.type_name);
    log::debug!("Recorded link {}", link);
    db.add_link(link);
    true
}

/// Earliest observed creation time per (source issue, target key).
#[derive(Debug, Default)]
pub struct PendingLinkDates {
    dates: Mutex<HashMap<(IssueId, String), DateTime<Utc>>>,
}

impl PendingLinkDates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records evidence for a link from `source` to the issue keyed `target_key`.
    ///
    /// The earliest timestamp wins: the first `Link` change for a target is
    /// the link's creation, later ones are re-links or edits.
    pub fn record(&self, source: &IssueId, target_key: &str, created: DateTime<Utc>) {
        let mut dates = self.dates.lock();
        dates
            .entry((source.clone(), target_key.to_string()))
            .and_modify(|existing| {
                if created < *existing {
                    *existing = created;
                }
            })
            .or_insert(created);
    }

    /// Records every piece of changelog evidence found on `source`.
    pub fn record_all(&self, source: &IssueId, evidence: Vec<LinkEvidence>) {
        for item in evidence {
            self.record(source, &item.target_key, item.created);
        }
    }

    pub fn get(&self, source: &IssueId, target_key: &str) -> Option<DateTime<Utc>> {
        self.dates
            .lock()
            .get(&(source.clone(), target_key.to_string()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.dates.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.lock().is_empty()
    }

    /// Empties the store, grouping entries by source issue.
    fn take_by_source(&self) -> HashMap<IssueId, HashMap<String, DateTime<Utc>>> {
        let drained = std::mem::take(&mut *self.dates.lock());
        let mut by_source: HashMap<IssueId, HashMap<String, DateTime<Utc>>> = HashMap::new();
        for ((source, target_key), created) in drained {
            by_source.entry(source).or_default().insert(target_key, created);
        }
        by_source
    }
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Links whose `created` was set.
    pub links_dated: usize,
    /// Pending entries that matched no link and were dropped.
    pub unmatched: usize,
}

/// Stamps pending creation dates onto graph links and empties `pending`.
///
/// Must only run once no worker is writing any more. Matching goes through
/// the target issue's key, so evidence for targets that were never fetched
/// (or whose key changed) is dropped without error.
pub fn reconcile_link_dates(db: &Database, pending: &PendingLinkDates) -> ReconcileSummary {
    let keys = db.issue_keys();
    let mut summary = ReconcileSummary::default();

    for (source, dates) in pending.take_by_source() {
        let mut matched_keys = std::collections::HashSet::new();
        summary.links_dated += db.resolve_link_dates(&source, |link| {
            let key = keys.get(&link.to)?;
            let date = dates.get(key)?;
            matched_keys.insert(key.clone());
            Some(*date)
        });

        let dropped = dates.len() - matched_keys.len();
        if dropped > 0 {
            log::debug!(
                "{} link date(s) for {} matched no harvested link",
                dropped,
                source
            );
        }
        summary.unmatched += dropped;
    }

    summary
}
