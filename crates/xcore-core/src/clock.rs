// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction so schedule-time comparisons (`bk_single_sched`'s
//! `sched_time`, log record timestamps) are deterministic in tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time, in Unix epoch milliseconds.
pub trait Clock: Send + Sync {
    fn epoch_ms(&self) -> i64;

    fn epoch_secs(&self) -> i64 {
        self.epoch_ms() / 1000
    }
}

/// Real wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Fixed/advanceable clock for tests.
#[derive(Debug)]
pub struct FakeClock(AtomicI64);

impl FakeClock {
    pub fn new(epoch_ms: i64) -> Self {
        Self(AtomicI64::new(epoch_ms))
    }

    pub fn advance_ms(&self, delta: i64) {
        self.0.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn set(&self, epoch_ms: i64) {
        self.0.store(epoch_ms, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clock for FakeClock {
    fn epoch_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Lets a shared clock (e.g. `Arc<FakeClock>`) be advanced by a test
/// after it has been handed to a dispatcher as a `Box<dyn Clock>`.
impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn epoch_ms(&self) -> i64 {
        (**self).epoch_ms()
    }
}
