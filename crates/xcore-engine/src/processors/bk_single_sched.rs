// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring backup schedule: chains `bk_single_full` instances, one
//! per tick of the configured interval, for `count` repetitions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use xcore_core::job::ARG_PARAMS;
use xcore_core::state::SchedState;
use xcore_core::{Error as CoreError, Job, JobId};

use crate::error::EngineError;
use crate::processors::common::{finish, spawn_child, spawn_sibling, transition};
use crate::processors::{ProcCtx, Processor};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScheduleArgs {
    sched_time: i64,
    full_bk_intvl: i64,
    incr_bk_intvl: i64,
    count: i64,
}

fn parse_args(job: &Job) -> Result<ScheduleArgs, EngineError> {
    let raw = job.arg(ARG_PARAMS).unwrap_or("{}");
    serde_json::from_str(raw).map_err(|_| EngineError::Core(CoreError::EArg))
}

pub struct BkSingleSched;

#[async_trait]
impl Processor for BkSingleSched {
    fn kind(&self) -> &'static str {
        "bk_single_sched"
    }

    async fn run(&self, ctx: &mut ProcCtx<'_>, job_id: JobId) -> Result<(), EngineError> {
        let mut job = ctx.tx.fetch(job_id).await?;
        match job.state.sched {
            SchedState::Created => transition(ctx.tx, ctx.clock, &mut job, SchedState::Ready, 0, &[]).await,
            SchedState::Ready => on_ready(ctx, &mut job).await,
            SchedState::Blocked => on_blocked(ctx, &mut job).await,
            SchedState::Term => on_term(ctx, &mut job).await,
            _ => Ok(()),
        }
    }
}

async fn on_ready(ctx: &mut ProcCtx<'_>, job: &mut Job) -> Result<(), EngineError> {
    let params = parse_args(job)?;
    if ctx.clock.epoch_secs() < params.sched_time {
        return Ok(());
    }

    if job.sub.is_none() {
        let child_id = spawn_child(ctx.tx, job, "bk_single_full", None, job.arg(xcore_core::job::ARG_PLUGIN)).await?;
        job.sub = child_id;
        return transition(ctx.tx, ctx.clock, job, SchedState::Blocked, 0, &[]).await;
    }

    let child = ctx.tx.fetch_partial(job.sub).await?;
    // Picked variant for the documented ambiguity: a still-running
    // instance re-blocks the schedule rather than leaving it polling
    // in READY.
    if !child.done {
        return transition(ctx.tx, ctx.clock, job, SchedState::Blocked, 0, &[]).await;
    }
    if child.result != 0 {
        return finish(ctx.tx, ctx.clock, job, CoreError::ESub.code(), &[]).await;
    }

    if job.next.is_none() && params.count != 1 {
        // Base the next slot on this instance's own scheduled time, not
        // whatever wall-clock time it happened to finish at, so a
        // backup chain that runs long doesn't drift its cadence.
        let next_sched_time = params.sched_time + params.full_bk_intvl.min(params.incr_bk_intvl);
        let next_args = ScheduleArgs {
            sched_time: next_sched_time,
            full_bk_intvl: params.full_bk_intvl,
            incr_bk_intvl: params.incr_bk_intvl,
            count: params.count - 1,
        };
        let next_json =
            serde_json::to_string(&next_args).map_err(|_| EngineError::Core(CoreError::EArg))?;
        let next_id = spawn_sibling(
            ctx.tx,
            job,
            "bk_single_sched",
            Some(&next_json),
            job.arg(xcore_core::job::ARG_PLUGIN),
        )
        .await?;
        job.next = next_id;
    }

    finish(ctx.tx, ctx.clock, job, 0, &[("instance", Value::from(job.sub.get()))]).await
}

async fn on_blocked(ctx: &mut ProcCtx<'_>, job: &mut Job) -> Result<(), EngineError> {
    let params = parse_args(job)?;
    if ctx.clock.epoch_secs() >= params.sched_time {
        transition(ctx.tx, ctx.clock, job, SchedState::Ready, 0, &[]).await
    } else {
        Ok(())
    }
}

async fn on_term(ctx: &mut ProcCtx<'_>, job: &mut Job) -> Result<(), EngineError> {
    if ctx.tx.count_undone_subs(job.id).await? == 0 {
        finish(ctx.tx, ctx.clock, job, 0, &[]).await
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[path = "bk_single_sched_tests.rs"]
mod tests;
