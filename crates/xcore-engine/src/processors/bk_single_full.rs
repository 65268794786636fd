// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One backup instance: a `snap` followed by an `export` (which in turn
//! chains a `put`). `export`'s own `result` already absorbs `put`'s
//! outcome via the stage processor's `TERM` propagation, so this
//! processor only ever needs to look at `snap` and `export` directly.

use async_trait::async_trait;
use xcore_core::job::ARG_PLUGIN;
use xcore_core::state::SchedState;
use xcore_core::{Error as CoreError, Job, JobId};

use crate::error::EngineError;
use crate::processors::common::{finish, spawn_child, spawn_sibling, transition};
use crate::processors::{ProcCtx, Processor};

pub struct BkSingleFull;

#[async_trait]
impl Processor for BkSingleFull {
    fn kind(&self) -> &'static str {
        "bk_single_full"
    }

    async fn run(&self, ctx: &mut ProcCtx<'_>, job_id: JobId) -> Result<(), EngineError> {
        let mut job = ctx.tx.fetch(job_id).await?;
        match job.state.sched {
            SchedState::Created => transition(ctx.tx, ctx.clock, &mut job, SchedState::Ready, 0, &[]).await,
            SchedState::Ready => on_ready(ctx, &mut job).await,
            SchedState::Blocked => on_blocked(ctx, &mut job).await,
            _ => Ok(()),
        }
    }
}

async fn on_ready(ctx: &mut ProcCtx<'_>, job: &mut Job) -> Result<(), EngineError> {
    if job.sub.is_none() {
        let snap_id = spawn_child(ctx.tx, job, "snap", None, job.arg(ARG_PLUGIN)).await?;
        job.sub = snap_id;
        return transition(ctx.tx, ctx.clock, job, SchedState::Blocked, 0, &[]).await;
    }

    let mut snap = ctx.tx.fetch(job.sub).await?;
    if !snap.done {
        return transition(ctx.tx, ctx.clock, job, SchedState::Blocked, 0, &[]).await;
    }
    if snap.result != 0 {
        return finish(ctx.tx, ctx.clock, job, CoreError::ESub.code(), &[]).await;
    }

    if snap.next.is_none() {
        let export_id = spawn_sibling(ctx.tx, &snap, "export", None, snap.arg(ARG_PLUGIN)).await?;
        snap.next = export_id;
        ctx.tx.update_structural(&snap).await?;
        return transition(ctx.tx, ctx.clock, job, SchedState::Blocked, 0, &[]).await;
    }

    let export = ctx.tx.fetch_partial(snap.next).await?;
    if !export.done {
        return transition(ctx.tx, ctx.clock, job, SchedState::Blocked, 0, &[]).await;
    }
    if export.result != 0 {
        return finish(ctx.tx, ctx.clock, job, CoreError::ESub.code(), &[]).await;
    }
    finish(ctx.tx, ctx.clock, job, 0, &[]).await
}

async fn on_blocked(ctx: &mut ProcCtx<'_>, job: &mut Job) -> Result<(), EngineError> {
    if ctx.tx.count_undone_subs(job.id).await? == 0 {
        transition(ctx.tx, ctx.clock, job, SchedState::Ready, 0, &[]).await
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[path = "bk_single_full_tests.rs"]
mod tests;
