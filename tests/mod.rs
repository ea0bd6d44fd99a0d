// tests/mod.rs
//! Test suite organization for jira-harvest
//!
//! Unit tests exercise single components through the public API; integration
//! tests drive whole harvests against in-memory issue sources.

#[cfg(test)]
pub mod unit;

#[cfg(test)]
pub mod integration;
