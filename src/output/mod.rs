// src/output/mod.rs
//! Writing the harvested database to disk.
//!
//! This is the only module that performs file I/O.

mod writer;

pub use writer::write_database;
