// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifiers.
//!
//! Ids are dense positive `i32`s assigned by the `jobs` table's primary
//! key. `0` is the sentinel for "no link" used by `sub`/`next`/`parent`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a job row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i32);

impl JobId {
    /// Sentinel meaning "no job" — used for `sub`, `next`, and `parent`
    /// when a link is absent.
    pub const NONE: JobId = JobId(0);

    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// True when this id is the `NONE` sentinel.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// True when this id refers to an actual row.
    pub fn is_some(self) -> bool {
        self.0 != 0
    }

    /// `Some(self)` unless this is the `NONE` sentinel.
    pub fn as_option(self) -> Option<JobId> {
        if self.is_none() {
            None
        } else {
            Some(self)
        }
    }
}

impl Default for JobId {
    fn default() -> Self {
        JobId::NONE
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for JobId {
    fn from(id: i32) -> Self {
        JobId(id)
    }
}

impl From<JobId> for i32 {
    fn from(id: JobId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
