// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared transition/spawn plumbing used by every processor: the
//! (a) begin, (b) dispatch, (c) log, (d) commit shape is identical
//! across job kinds, only the state machine in between differs.

use serde_json::Value;
use xcore_core::job::JobConfig;
use xcore_core::log::LogRecord;
use xcore_core::state::SchedState;
use xcore_core::{Clock, Error as CoreError, Job, JobId};
use xcore_storage::{append_log, Tx};

use crate::error::EngineError;

/// Insert a new row as a true child of `parent`: `child.parent =
/// parent.id`. Used for the `sub` link (first child).
pub(crate) async fn spawn_child(
    tx: &mut Tx,
    parent: &Job,
    kind: &str,
    params: Option<&str>,
    plugin_arg: Option<&str>,
) -> Result<JobId, EngineError> {
    spawn_under(tx, parent.id, parent.grp, parent.root, &parent.feid, kind, params, plugin_arg).await
}

/// Insert a new row as a sibling of `anchor`: `child.parent =
/// anchor.parent`. Used for the `next` link (later stages/instances
/// chained after the current one, under the same parent).
pub(crate) async fn spawn_sibling(
    tx: &mut Tx,
    anchor: &Job,
    kind: &str,
    params: Option<&str>,
    plugin_arg: Option<&str>,
) -> Result<JobId, EngineError> {
    spawn_under(
        tx,
        anchor.parent,
        anchor.grp,
        anchor.root,
        &anchor.feid,
        kind,
        params,
        plugin_arg,
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn spawn_under(
    tx: &mut Tx,
    parent_id: JobId,
    grp: JobId,
    root: JobId,
    feid: &str,
    kind: &str,
    params: Option<&str>,
    plugin_arg: Option<&str>,
) -> Result<JobId, EngineError> {
    let mut cfg = JobConfig::new(kind).with_feid(feid);
    if let Some(p) = params {
        cfg = cfg.with_params(p);
    }
    if let Some(a) = plugin_arg {
        cfg = cfg.with_plugin_arg(a);
    }
    let id = tx.insert(cfg).await?;
    let mut child = tx.fetch(id).await?;
    child.parent = parent_id;
    child.grp = grp;
    child.root = root;
    tx.update_structural(&child).await?;
    Ok(id)
}

/// Find the sibling whose `next` points at `job` — the data-handoff
/// predecessor for `put`/`import`'s `Inherit` step. Walks the shared
/// parent's `sub`/`next` chain rather than a reverse index, since the
/// job-store contract exposes no `next = ?` lookup.
pub(crate) async fn find_predecessor(tx: &mut Tx, job: &Job) -> Result<JobId, EngineError> {
    let parent = tx.fetch_partial(job.parent).await?;
    let mut cur = parent.sub;
    while cur.is_some() {
        let row = tx.fetch_partial(cur).await?;
        if row.next == job.id {
            return Ok(cur);
        }
        cur = row.next;
    }
    Err(EngineError::Core(CoreError::EInvRec))
}

async fn log_transition(
    tx: &mut Tx,
    clock: &dyn Clock,
    job_id: JobId,
    proc: &str,
    before: SchedState,
    after: SchedState,
    status: i32,
    extra_kv: &[(&str, Value)],
) -> Result<(), EngineError> {
    let errmsg = CoreError::from_code(status).map(|e| e.to_string());
    let record = LogRecord {
        who: job_id,
        proc: proc.to_string(),
        state_before: before,
        state_after: after,
        unix_ts: clock.epoch_secs(),
        status,
        msg_object: Value::Null,
    };
    append_log(tx, job_id, record, extra_kv, errmsg.as_deref()).await?;
    Ok(())
}

/// Move `job` to `sched`, preserving extra bits, persist it, and append
/// a log record for the transition.
pub(crate) async fn transition(
    tx: &mut Tx,
    clock: &dyn Clock,
    job: &mut Job,
    sched: SchedState,
    status: i32,
    extra_kv: &[(&str, Value)],
) -> Result<(), EngineError> {
    let before = job.state.sched;
    job.state = job.state.transition(sched);
    tx.update_structural(job).await?;
    let proc = job.kind().unwrap_or("?").to_string();
    log_transition(tx, clock, job.id, &proc, before, sched, status, extra_kv).await
}

/// Move `job` straight to `DONE`, setting `done`/`result`.
pub(crate) async fn finish(
    tx: &mut Tx,
    clock: &dyn Clock,
    job: &mut Job,
    result: i32,
    extra_kv: &[(&str, Value)],
) -> Result<(), EngineError> {
    job.done = true;
    job.result = result;
    transition(tx, clock, job, SchedState::Done, result, extra_kv).await
}
