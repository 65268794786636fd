// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only builders shared by every crate's test suite. Gated behind
//! `test-support` so downstream crates can depend on it without pulling
//! it into release builds.

use crate::id::JobId;
use crate::job::Job;
use crate::policy::Policy;
use crate::state::{SchedState, State};

/// Builds a self-rooted [`Job`] with sensible defaults, overridden one
/// field at a time.
pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    pub fn new(id: i32) -> Self {
        let jid = JobId::new(id);
        Self {
            job: Job {
                id: jid,
                sub: JobId::NONE,
                next: JobId::NONE,
                parent: jid,
                grp: jid,
                root: jid,
                state: State::new(SchedState::Created),
                done: false,
                result: 0,
                policy: Policy::NONE,
                feid: String::new(),
                args: Default::default(),
            },
        }
    }

    pub fn kind(mut self, kind: &str) -> Self {
        self.job.set_arg(crate::job::ARG_KIND, kind);
        self
    }

    pub fn params(mut self, json: &str) -> Self {
        self.job.set_arg(crate::job::ARG_PARAMS, json);
        self
    }

    pub fn plugin_arg(mut self, json: &str) -> Self {
        self.job.set_arg(crate::job::ARG_PLUGIN, json);
        self
    }

    pub fn sched(mut self, sched: SchedState) -> Self {
        self.job.state = self.job.state.transition(sched);
        self
    }

    pub fn parent(mut self, parent: JobId) -> Self {
        self.job.parent = parent;
        self
    }

    pub fn root(mut self, root: JobId) -> Self {
        self.job.root = root;
        self
    }

    pub fn grp(mut self, grp: JobId) -> Self {
        self.job.grp = grp;
        self
    }

    pub fn sub(mut self, sub: JobId) -> Self {
        self.job.sub = sub;
        self
    }

    pub fn next(mut self, next: JobId) -> Self {
        self.job.next = next;
        self
    }

    pub fn done(mut self, result: i32) -> Self {
        self.job.done = true;
        self.job.result = result;
        self.job.state = self.job.state.transition(SchedState::Done);
        self
    }

    pub fn build(self) -> Job {
        self.job
    }
}
