// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use sqlx::FromRow;
use xcore_core::{Job, JobId, Policy, State};

use crate::error::StorageError;

/// Raw row shape of the `jobs` table, one field per column.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: i32,
    pub sub: i32,
    pub next: i32,
    pub parent: i32,
    pub grp: i32,
    pub root: i32,
    pub state: i32,
    pub done: bool,
    pub result: i32,
    pub policy: i32,
    pub feid: String,
    pub arg0: Option<String>,
    pub arg1: Option<String>,
    pub arg2: Option<String>,
    pub arg3: Option<String>,
    pub arg4: Option<String>,
    pub arg5: Option<String>,
    pub arg6: Option<String>,
    pub arg7: Option<String>,
}

impl JobRow {
    pub fn into_job(self) -> Result<Job, StorageError> {
        let id = JobId::new(self.id);
        let state =
            State::decode(self.state).ok_or_else(|| StorageError::InvalidState(id))?;
        Ok(Job {
            id,
            sub: JobId::new(self.sub),
            next: JobId::new(self.next),
            parent: JobId::new(self.parent),
            grp: JobId::new(self.grp),
            root: JobId::new(self.root),
            state,
            done: self.done,
            result: self.result,
            policy: Policy(self.policy),
            feid: self.feid,
            args: [
                self.arg0, self.arg1, self.arg2, self.arg3, self.arg4, self.arg5, self.arg6,
                self.arg7,
            ],
        })
    }
}

/// Structural-only projection for cheap sibling checks (`FetchPartial`).
#[derive(Debug, Clone, FromRow)]
pub struct PartialRow {
    pub id: i32,
    pub sub: i32,
    pub next: i32,
    pub parent: i32,
    pub grp: i32,
    pub root: i32,
    pub state: i32,
    pub done: bool,
    pub result: i32,
    pub policy: i32,
}
