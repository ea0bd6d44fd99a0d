// tests/unit/mod.rs
//! Unit tests for jira-harvest components

#[cfg(test)]
mod error_handling;

#[cfg(test)]
mod records;
