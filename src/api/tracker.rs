// src/api/tracker.rs
//! Concurrent harvest of every issue the search returns.
//!
//! The first page is fetched alone to learn how many results exist and how
//! many the server hands out per page. The remaining offsets go into a
//! shared queue drained by a fixed pool of workers, each writing straight
//! into the shared database. Once every worker has been joined, link
//! creation dates are reconciled on the orchestrating task.

use super::links::{ingest_issue_link, reconcile_link_dates, LinkRegistry, PendingLinkDates};
use super::offset_queue::OffsetQueue;
use super::parser::{parse_issue, ParsedIssue};
use super::{IssueSource, SearchQuery};
use crate::constants::INITIAL_PAGE_SIZE;
use crate::error::AppError;
use crate::model::Database;
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Where a tracker is in its one-shot harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestPhase {
    Idle,
    FetchingFirstPage,
    /// The first page covered every result; no workers were needed.
    Complete,
    Dispatching,
    WorkersRunning,
    AllJoined,
    Reconciling,
    Done,
}

/// What a finished harvest fetched and what it had to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    /// Result count reported by the server.
    pub total: u64,
    /// Page size the server honored.
    pub page_size: u32,
    pub issues: usize,
    pub pages_fetched: usize,
    /// Offsets whose page fetch failed, in ascending order.
    pub failed_offsets: Vec<u64>,
    /// Workers that died before draining the queue. Whatever offset such a
    /// worker held is lost without being listed in `failed_offsets`.
    pub crashed_workers: usize,
    pub links_dated: usize,
    pub unmatched_link_dates: usize,
}

impl HarvestReport {
    /// Whether every scheduled page was fetched.
    pub fn is_complete(&self) -> bool {
        self.failed_offsets.is_empty() && self.crashed_workers == 0
    }
}

/// Result count and page size, learned from responses and read by every worker.
#[derive(Debug)]
struct Pagination {
    total: AtomicU64,
    page_size: AtomicU32,
    pages_fetched: AtomicUsize,
}

impl Pagination {
    fn new(page_size: u32) -> Self {
        Self {
            total: AtomicU64::new(0),
            page_size: AtomicU32::new(page_size),
            pages_fetched: AtomicUsize::new(0),
        }
    }

    fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }

    fn page_size(&self) -> u32 {
        self.page_size.load(Ordering::SeqCst)
    }

    fn pages_fetched(&self) -> usize {
        self.pages_fetched.load(Ordering::SeqCst)
    }

    /// Adopts the page size the server actually honored.
    fn learn_page_size(&self, honored: u32) {
        if honored > 0 {
            self.page_size.store(honored, Ordering::SeqCst);
        }
    }

    /// The first reported total is authoritative for the whole harvest.
    fn learn_total(&self, total: u64) {
        let _ = self
            .total
            .compare_exchange(0, total, Ordering::SeqCst, Ordering::SeqCst);
    }
}

/// Everything a worker needs to fetch and store one page. Cheap to clone.
#[derive(Clone)]
struct PageFetcher {
    source: Arc<dyn IssueSource>,
    db: Arc<Database>,
    links: Arc<LinkRegistry>,
    dates: Arc<PendingLinkDates>,
    pagination: Arc<Pagination>,
}

impl PageFetcher {
    /// Fetches the page starting at `offset` and stores every issue on it.
    ///
    /// Returns the number of issues the page held.
    async fn fetch_page(&self, offset: u64) -> Result<usize, AppError> {
        let query = SearchQuery::new(offset, self.pagination.page_size());
        let page = self.source.search(&query).await?;

        if let Some(honored) = page.max_results {
            self.pagination.learn_page_size(honored);
        }
        if let Some(total) = page.total {
            self.pagination.learn_total(total);
        }

        let count = page.issues.len();
        for raw in page.issues {
            self.store(parse_issue(raw));
        }
        self.pagination.pages_fetched.fetch_add(1, Ordering::SeqCst);

        log::debug!("Page at offset {} held {} issues", offset, count);
        Ok(count)
    }

    fn store(&self, parsed: ParsedIssue) {
        let ParsedIssue {
            issue,
            parent,
            links,
            link_evidence,
        } = parsed;
        let id = issue.id.clone();

        log::debug!("Storing {}", issue);
        for comment in &issue.comments {
            log::trace!("  comment {}", comment);
        }
        self.db.add_issue(issue);
        if let Some(parent) = parent {
            self.db.set_parent(id.clone(), parent);
        }
        for record in links {
            ingest_issue_link(&self.db, &self.links, &id, record);
        }
        self.dates.record_all(&id, link_evidence);
    }

    fn log_progress(&self) {
        log::info!(
            "finished: {} total: {} maxResults: {}",
            self.db.issue_count(),
            self.pagination.total(),
            self.pagination.page_size()
        );
    }
}

/// Harvests one JIRA instance into a [`Database`].
pub struct Tracker {
    fetcher: PageFetcher,
    phase: HarvestPhase,
}

impl Tracker {
    pub fn new(source: Arc<dyn IssueSource>) -> Self {
        Self::with_page_size(source, INITIAL_PAGE_SIZE)
    }

    /// Creates a tracker that asks for `page_size` results on its first call.
    pub fn with_page_size(source: Arc<dyn IssueSource>, page_size: u32) -> Self {
        Self {
            fetcher: PageFetcher {
                source,
                db: Arc::new(Database::new()),
                links: Arc::new(LinkRegistry::new()),
                dates: Arc::new(PendingLinkDates::new()),
                pagination: Arc::new(Pagination::new(page_size.max(1))),
            },
            phase: HarvestPhase::Idle,
        }
    }

    pub fn phase(&self) -> HarvestPhase {
        self.phase
    }

    /// The database fetched so far.
    pub fn database(&self) -> &Database {
        &self.fetcher.db
    }

    fn enter(&mut self, phase: HarvestPhase) {
        log::debug!("Harvest phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Fetches every issue with `parallelism` concurrent page workers.
    ///
    /// Failed pages are logged and skipped, so the resulting database may be
    /// incomplete; the report lists the offsets that were lost. A tracker
    /// harvests once: a second call returns `HarvestAlreadyRun`.
    pub async fn fetch_all(&mut self, parallelism: usize) -> Result<HarvestReport, AppError> {
        if self.phase != HarvestPhase::Idle {
            return Err(AppError::HarvestAlreadyRun);
        }
        let mut failed_offsets = Vec::new();

        self.enter(HarvestPhase::FetchingFirstPage);
        let first_batch_end = match self.fetcher.fetch_page(0).await {
            Ok(count) => count as u64,
            Err(e) => {
                log_fetch_failure(0, &e);
                failed_offsets.push(0);
                0
            }
        };
        self.fetcher.log_progress();

        let total = self.fetcher.pagination.total();
        let mut crashed_workers = 0;
        if first_batch_end >= total {
            self.enter(HarvestPhase::Complete);
        } else {
            self.enter(HarvestPhase::Dispatching);
            let queue = Arc::new(OffsetQueue::for_remaining(
                first_batch_end,
                self.fetcher.pagination.page_size(),
                total,
            ));
            let workers = parallelism.max(1);
            log::info!(
                "Dispatching {} remaining pages to {} workers",
                queue.enqueued(),
                workers
            );

            self.enter(HarvestPhase::WorkersRunning);
            let outcome = self.run_workers(workers, queue).await;
            failed_offsets.extend(outcome.failed_offsets);
            crashed_workers = outcome.crashed;
            self.enter(HarvestPhase::AllJoined);
        }

        self.enter(HarvestPhase::Reconciling);
        let summary = reconcile_link_dates(&self.fetcher.db, &self.fetcher.dates);
        log::info!(
            "Dated {} links ({} changelog entries unmatched)",
            summary.links_dated,
            summary.unmatched
        );
        self.enter(HarvestPhase::Done);

        failed_offsets.sort_unstable();
        Ok(HarvestReport {
            total,
            page_size: self.fetcher.pagination.page_size(),
            issues: self.fetcher.db.issue_count(),
            pages_fetched: self.fetcher.pagination.pages_fetched(),
            failed_offsets,
            crashed_workers,
            links_dated: summary.links_dated,
            unmatched_link_dates: summary.unmatched,
        })
    }

    /// Spawns the worker pool and waits for every worker to finish.
    ///
    /// A worker that panics is logged and counted; the others keep running
    /// and are still joined.
    async fn run_workers(&self, workers: usize, queue: Arc<OffsetQueue>) -> PoolOutcome {
        let mut join_set = JoinSet::new();
        for worker in 0..workers {
            let fetcher = self.fetcher.clone();
            let queue = Arc::clone(&queue);
            join_set.spawn(async move { run_page_worker(worker, fetcher, queue).await });
        }

        let mut outcome = PoolOutcome::default();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(worker_failures) => outcome.failed_offsets.extend(worker_failures),
                Err(e) => {
                    let err = AppError::InternalError {
                        message: format!("Page worker task failed with join error: {}", e),
                        source: Some(Box::new(e)),
                    };
                    log::error!("{}", err);
                    outcome.crashed += 1;
                }
            }
        }
        outcome
    }
}

/// What the worker pool left behind once every worker was joined.
#[derive(Debug, Default)]
struct PoolOutcome {
    failed_offsets: Vec<u64>,
    crashed: usize,
}

fn log_fetch_failure(offset: u64, err: &AppError) {
    if err.is_remote() {
        log::warn!("fetch from {} failed: {}", offset, err);
    } else {
        log::error!("fetch from {} failed: {}", offset, err);
    }
}

/// Fetches pages until the queue is drained. Returns the offsets that failed.
async fn run_page_worker(
    worker: usize,
    fetcher: PageFetcher,
    queue: Arc<OffsetQueue>,
) -> Vec<u64> {
    let mut failed = Vec::new();
    while let Some(offset) = queue.next() {
        if let Err(e) = fetcher.fetch_page(offset).await {
            log_fetch_failure(offset, &e);
            failed.push(offset);
        }
        fetcher.log_progress();
    }
    log::debug!("Worker {} found no more pages, exiting", worker);
    failed
}
