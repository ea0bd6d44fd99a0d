// tests/integration/mod.rs
//! Integration tests for jira-harvest
//!
//! Each test runs a complete `Tracker::fetch_all` against a scripted source,
//! covering pagination, failure tolerance, and link-date reconciliation.


#[cfg(test)]
mod output;
