// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One restore: validates the referenced historical job is an `export`,
//! then spawns a `get` child and waits on it. `get`'s own `result`
//! already absorbs `import`'s outcome via the stage processor's `TERM`
//! propagation.

use async_trait::async_trait;
use serde::Deserialize;
use xcore_core::job::{ARG_PARAMS, ARG_PLUGIN};
use xcore_core::state::SchedState;
use xcore_core::{Error as CoreError, Job, JobId};

use crate::error::EngineError;
use crate::processors::common::{finish, spawn_child, transition};
use crate::processors::{ProcCtx, Processor};

#[derive(Debug, Deserialize)]
struct RestoreArgs {
    rstr_to_job_id: i32,
}

pub struct RstrSingle;

#[async_trait]
impl Processor for RstrSingle {
    fn kind(&self) -> &'static str {
        "rstr_single"
    }

    async fn run(&self, ctx: &mut ProcCtx<'_>, job_id: JobId) -> Result<(), EngineError> {
        let mut job = ctx.tx.fetch(job_id).await?;
        match job.state.sched {
            SchedState::Created => on_created(ctx, &mut job).await,
            SchedState::Ready => on_ready(ctx, &mut job).await,
            SchedState::Blocked => on_blocked(ctx, &mut job).await,
            _ => Ok(()),
        }
    }
}

async fn on_created(ctx: &mut ProcCtx<'_>, job: &mut Job) -> Result<(), EngineError> {
    let raw = job.arg(ARG_PARAMS).unwrap_or("{}");
    let params: RestoreArgs =
        serde_json::from_str(raw).map_err(|_| EngineError::Core(CoreError::EArg))?;

    let referenced = match ctx.tx.fetch(JobId::new(params.rstr_to_job_id)).await {
        Ok(j) => j,
        Err(_) => return finish(ctx.tx, ctx.clock, job, CoreError::EInvRec.code(), &[]).await,
    };
    if referenced.kind() != Some("export") {
        return finish(ctx.tx, ctx.clock, job, CoreError::EInvRec.code(), &[]).await;
    }

    transition(ctx.tx, ctx.clock, job, SchedState::Ready, 0, &[]).await
}

async fn on_ready(ctx: &mut ProcCtx<'_>, job: &mut Job) -> Result<(), EngineError> {
    if job.sub.is_none() {
        let get_id = spawn_child(
            ctx.tx,
            job,
            "get",
            job.arg(ARG_PARAMS),
            job.arg(ARG_PLUGIN),
        )
        .await?;
        job.sub = get_id;
        return transition(ctx.tx, ctx.clock, job, SchedState::Blocked, 0, &[]).await;
    }

    let get = ctx.tx.fetch_partial(job.sub).await?;
    if !get.done {
        return transition(ctx.tx, ctx.clock, job, SchedState::Blocked, 0, &[]).await;
    }
    if get.result != 0 {
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
#[path = "rstr_single_tests.rs"]
mod tests;
