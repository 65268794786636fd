// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared `CREATED -> RUN -> TERM -> DONE` structure for the five
//! plugin-wrapping stages: `snap`, `export`, `import`, `get`, `put`.
//!
//! `export` and `get` spawn their follow-on sibling (`put`/`import`)
//! once their own plugin exits, passing down their (just overwritten)
//! `arg2` — the plugin's own output becomes the next stage's input, so
//! a plugin that wants to hand a target selector forward is expected to
//! echo it back in `arg.out` alongside whatever else it produced.

use async_trait::async_trait;
use serde_json::{json, Value};
use xcore_core::job::{ARG_PARAMS, ARG_PLUGIN};
use xcore_core::state::SchedState;
use xcore_core::{Error as CoreError, Job, JobId};
use xcore_supervisor::PollOutcome;

use crate::error::EngineError;
use crate::processors::common::{find_predecessor, finish, spawn_sibling, transition};
use crate::processors::{ProcCtx, Processor};

pub struct StageProcessor {
    kind: &'static str,
    next_stage: Option<&'static str>,
    writes_tag: bool,
    inherits_data: bool,
}

impl StageProcessor {
    pub fn snap() -> Self {
        StageProcessor {
            kind: "snap",
            next_stage: None,
            writes_tag: false,
            inherits_data: false,
        }
    }

    pub fn export() -> Self {
        StageProcessor {
            kind: "export",
            next_stage: Some("put"),
            writes_tag: true,
            inherits_data: false,
        }
    }

    pub fn put() -> Self {
        StageProcessor {
            kind: "put",
            next_stage: None,
            writes_tag: false,
            inherits_data: true,
        }
    }

    pub fn get() -> Self {
        StageProcessor {
            kind: "get",
            next_stage: Some("import"),
            writes_tag: false,
            inherits_data: false,
        }
    }

    pub fn import() -> Self {
        StageProcessor {
            kind: "import",
            next_stage: None,
            writes_tag: false,
            inherits_data: true,
        }
    }
}

#[async_trait]
impl Processor for StageProcessor {
    fn kind(&self) -> &'static str {
        self.kind
    }

    async fn run(&self, ctx: &mut ProcCtx<'_>, job_id: JobId) -> Result<(), EngineError> {
        let mut job = ctx.tx.fetch(job_id).await?;
        match job.state.sched {
            SchedState::Created => self.on_created(ctx, &mut job).await,
            SchedState::Run => self.on_run(ctx, &mut job).await,
            SchedState::Term => self.on_term(ctx, &mut job).await,
            _ => Ok(()),
        }
    }
}

impl StageProcessor {
    async fn on_created(&self, ctx: &mut ProcCtx<'_>, job: &mut Job) -> Result<(), EngineError> {
        if self.inherits_data {
            let predecessor = find_predecessor(ctx.tx, job).await?;
            ctx.workdir.prepare(job.id)?;
            ctx.workdir.inherit(predecessor, job.id)?;
        } else {
            ctx.workdir.prepare(job.id)?;
        }

        let plugin_arg = job.arg(ARG_PLUGIN).unwrap_or("{}").to_string();
        let chosen = ctx.registry.choose(&plugin_arg)?;
        let source_id = chosen.source.as_ref().map(|d| d.id);
        let source_ver = chosen.source.as_ref().map(|d| d.ver);
        let target_id = chosen.target.as_ref().map(|d| d.id);
        let target_ver = chosen.target.as_ref().map(|d| d.ver);
        let descriptor = chosen
            .source
            .or(chosen.target)
            .ok_or(EngineError::Core(CoreError::ENoPlug))?;

        ctx.workdir.write_kv_int(job.id, "id", job.id.get() as i64)?;
        ctx.workdir.write_kv_string(job.id, "cmd", self.kind)?;
        ctx.workdir.write_kv_string(job.id, "arg", &plugin_arg)?;
        if self.kind == "get" {
            if let Some(rstr_arg) = job.arg(ARG_PARAMS) {
                ctx.workdir.write_kv_string(job.id, "rstr_arg", rstr_arg)?;
            }
        }
        if self.writes_tag {
            let tag = json!({
                "job_id": job.id.get(),
                "snap_ts": ctx.clock.epoch_secs(),
                "source_plugin_id": source_id,
                "source_plugin_ver": source_ver,
                "target_plugin_id": target_id,
                "target_plugin_ver": target_ver,
            });
            let blob = serde_json::to_vec(&tag).map_err(|_| EngineError::Core(CoreError::EArg))?;
            ctx.workdir.write_kv_bytes(job.id, "tag", &blob)?;
        }

        let pid = ctx
            .supervisor
            .spawn(&descriptor.exec_path(), &ctx.workdir.root_of(job.id))?;
        ctx.workdir.write_kv_int(job.id, "pid", pid as i64)?;

        transition(ctx.tx, ctx.clock, job, SchedState::Run, 0, &[]).await
    }

    async fn on_run(&self, ctx: &mut ProcCtx<'_>, job: &mut Job) -> Result<(), EngineError> {
        let pid = ctx.workdir.read_kv_int(job.id, "pid")? as i32;
        let outcome = match ctx.supervisor.poll(job.id, pid, ctx.workdir) {
            Ok(outcome) => outcome,
            Err(xcore_supervisor::SupervisorError::Core(CoreError::EBadJ)) => {
                // Lost child: killed or crashed before writing meta/status.
                // Terminate the job with EBADJ rather than retrying the
                // poll forever against a pid that will never answer again.
                job.result = CoreError::EBadJ.code();
                return transition(
                    ctx.tx,
                    ctx.clock,
                    job,
                    SchedState::Term,
                    CoreError::EBadJ.code(),
                    &[("exit_status", Value::from(CoreError::EBadJ.code()))],
                )
                .await;
            }
            Err(e) => return Err(e.into()),
        };
        match outcome {
            PollOutcome::Running => Ok(()),
            PollOutcome::Exited { status, arg_out } => {
                job.set_arg(ARG_PLUGIN, arg_out.to_string());
                job.result = status;

                if status == 0 {
                    if let Some(next_kind) = self.next_stage {
                        let params = job.arg(ARG_PARAMS).map(str::to_string);
                        let plugin_arg = job.arg(ARG_PLUGIN).map(str::to_string);
                        let child_id =
                            spawn_sibling(ctx.tx, job, next_kind, params.as_deref(), plugin_arg.as_deref())
                                .await?;
                        job.next = child_id;
                    }
                }

                transition(
                    ctx.tx,
                    ctx.clock,
                    job,
                    SchedState::Term,
                    status,
                    &[("exit_status", Value::from(status))],
                )
                .await
            }
        }
    }

    async fn on_term(&self, ctx: &mut ProcCtx<'_>, job: &mut Job) -> Result<(), EngineError> {
        let mut result = job.result;

        if self.next_stage.is_some() && job.next.is_some() {
            let child = ctx.tx.fetch_partial(job.next).await?;
            if !child.done {
                return Ok(());
            }
            if child.result != 0 {
                result = CoreError::ESub.code();
            }
        }

        finish(ctx.tx, ctx.clock, job, result, &[]).await?;
        ctx.workdir.cleanup(job.id)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
