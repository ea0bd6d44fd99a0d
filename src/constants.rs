// src/constants.rs
//! Domain constants that define the operational boundaries of the harvest.
//!
//! Each constant is named for the domain concept it constrains. Reading
//! these should tell you how the tool talks to JIRA: which query it sends,
//! how much it asks for per page, and how it reads dates back.

// ---------------------------------------------------------------------------
// JIRA search query
// ---------------------------------------------------------------------------

/// Path of the REST API below the instance base URL.
pub const JIRA_API_PATH: &str = "/rest/api/latest";

/// Search endpoint, relative to [`JIRA_API_PATH`].
pub const JIRA_SEARCH_ENDPOINT: &str = "/search";

/// Ordering by creation time keeps pagination offsets stable across calls.
pub const SEARCH_JQL: &str = "ORDER BY Created Asc";

/// Restricts the `fields` map of each returned issue.
///
/// `id`, `key` and `self` are always returned regardless of this filter.
pub const SEARCH_FIELDS: &str = "summary,description,comment,parent,issuelinks,created";

/// Expands the per-issue change history, used for link creation dates.
pub const SEARCH_EXPAND: &str = "changelog";

/// Page size requested on the first call.
///
/// The server may honor a smaller value; the honored size is learned from
/// the first response and used for every subsequent offset.
pub const INITIAL_PAGE_SIZE: u32 = 250;

// ---------------------------------------------------------------------------
// Record parsing
// ---------------------------------------------------------------------------

/// Timestamp format used throughout the JIRA REST API,
/// e.g. `2013-04-02T10:21:07.000+0000`.
pub const JIRA_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Changelog field name that marks an issue-link change.
pub const LINK_HISTORY_FIELD: &str = "Link";

// ---------------------------------------------------------------------------
// Worker pool
// ---------------------------------------------------------------------------

/// Upper bound on concurrent page fetchers.
pub const MAX_CONCURRENCY: usize = 64;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
