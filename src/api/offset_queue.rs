// src/api/offset_queue.rs
//! Shared queue of page offsets for the worker pool.
//!
//! The queue is filled completely before any worker starts, so "empty"
//! means "drained" and a worker can exit on the first empty steal.

use crossbeam::deque::{Injector, Steal};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Offsets still to fetch, shared by every worker.
#[derive(Debug, Default)]
pub struct OffsetQueue {
    injector: Injector<u64>,
    /// Number of offsets ever enqueued
    enqueued: AtomicUsize,
}

impl OffsetQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the queue holding every offset after the first batch.
    ///
    /// Offsets run `first_batch_end, first_batch_end + page_size, ...` while
    /// below `total`. A zero page size is treated as one so the sequence
    /// always terminates.
    pub fn for_remaining(first_batch_end: u64, page_size: u32, total: u64) -> Self {
        let queue = Self::new();
        let step = u64::from(page_size.max(1));
        let mut start = first_batch_end;
        while start < total {
            queue.push(start);
            start += step;
        }
        queue
    }

    pub fn push(&self, offset: u64) {
        self.enqueued.fetch_add(1, Ordering::SeqCst);
        self.injector.push(offset);
    }

    /// Takes the next offset, or `None` once the queue is drained.
    pub fn next(&self) -> Option<u64> {
        loop {
            match self.injector.steal() {
                Steal::Success(offset) => return Some(offset),
                Steal::Empty => return None,
                Steal::Retry => continue,
            }
        }
    }

    pub fn enqueued(&self) -> usize {
        self.enqueued.load(Ordering::SeqCst)
    }
}
