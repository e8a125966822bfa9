// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Millisecond-based identifiers for new feedback and batches.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out strictly increasing IDs, seeded from the wall clock.
///
/// `next = max(now_ms, last + 1)`, so IDs stay unique within the process
/// even when several are requested in the same millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> u64 {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let mut cur = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(cur + 1);
            match self.last.compare_exchange_weak(
                cur,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => cur = actual,
            }
        }
    }

    pub fn next_batch_id(&self) -> String {
        format!("BATCH-{}", self.next_id())
    }
}
