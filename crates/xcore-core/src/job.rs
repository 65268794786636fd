// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `jobs` row: tree links, scheduling state, and the eight generic
//! argument columns.

use crate::id::JobId;
use crate::policy::Policy;
use crate::state::State;
use serde::{Deserialize, Serialize};

/// Number of generic `argN` text columns on a job row.
pub const ARG_SLOTS: usize = 8;

/// Conventional slot indices. Every processor agrees on these three;
/// the remaining slots are kind-specific.
pub const ARG_KIND: usize = 0;
pub const ARG_PARAMS: usize = 1;
pub const ARG_PLUGIN: usize = 2;

/// A fully populated `jobs` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub sub: JobId,
    pub next: JobId,
    pub parent: JobId,
    pub grp: JobId,
    pub root: JobId,
    pub state: State,
    pub done: bool,
    /// `0` success, negative broker error, positive plugin/errno passthrough.
    pub result: i32,
    pub policy: Policy,
    pub feid: String,
    pub args: [Option<String>; ARG_SLOTS],
}

impl Job {
    pub fn arg(&self, slot: usize) -> Option<&str> {
        self.args[slot].as_deref()
    }

    pub fn set_arg(&mut self, slot: usize, value: impl Into<String>) {
        self.args[slot] = Some(value.into());
        self.policy.set(slot);
    }

    /// The processor name bound to `arg0`.
    pub fn kind(&self) -> Option<&str> {
        self.arg(ARG_KIND)
    }

    /// True once this row has fully completed (success or terminal error).
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// True when this job is its own tree root (a freshly inserted intent).
    pub fn is_root(&self) -> bool {
        self.root == self.id
    }
}

/// Arguments to [`crate::job`]-store `Insert` — everything needed to
/// self-root a new row before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobConfig {
    pub state: Option<State>,
    pub feid: String,
    pub args: [Option<String>; ARG_SLOTS],
}

impl JobConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        let mut cfg = JobConfig::default();
        cfg.args[ARG_KIND] = Some(kind.into());
        cfg
    }

    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.args[ARG_PARAMS] = Some(params.into());
        self
    }

    pub fn with_plugin_arg(mut self, plugin_arg: impl Into<String>) -> Self {
        self.args[ARG_PLUGIN] = Some(plugin_arg.into());
        self
    }

    pub fn with_feid(mut self, feid: impl Into<String>) -> Self {
        self.feid = feid.into();
        self
    }

    pub fn policy(&self) -> Policy {
        let slots: Vec<usize> = self
            .args
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.is_some().then_some(i))
            .collect();
        Policy::with(&slots)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
