// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single-threaded tick loop: resume-scan for the next undone job,
//! dispatch it to its processor inside one transaction, reap dead
//! children between ticks.

use std::time::Duration;

use tracing::{debug, error, warn};
use xcore_core::Clock;
use xcore_registry::Registry;
use xcore_storage::JobStore;
use xcore_supervisor::Supervisor;
use xcore_workdir::WorkDirManager;

use crate::error::EngineError;
use crate::processors::common::finish;
use crate::processors::{ProcCtx, ProcessorTable};

/// The idle-sleep duration once the dispatcher catches up to the tail
/// of the table.
const IDLE_SLEEP: Duration = Duration::from_secs(1);

/// Everything the dispatcher needs held for its whole run, as opposed
/// to the per-tick [`ProcCtx`] borrowed from it.
pub struct DispatcherEnv {
    pub store: JobStore,
    pub clock: Box<dyn Clock>,
    pub workdir: WorkDirManager,
    pub registry: Registry,
    pub supervisor: Supervisor,
    pub processors: ProcessorTable,
}

/// Owns the resume cursor and runs the tick loop described in the
/// component design: `AllocateId`, lock the tree, dispatch, harvest.
pub struct Dispatcher {
    env: DispatcherEnv,
    cursor: i32,
}

impl Dispatcher {
    pub fn new(env: DispatcherEnv) -> Self {
        Self { env, cursor: 0 }
    }

    /// Runs forever. Returns only if a fatal, non-recoverable storage
    /// error escapes `tick` — a processor's own errors never propagate
    /// this far, they terminate just the one job.
    pub async fn run(&mut self) -> Result<(), EngineError> {
        loop {
            if !self.tick().await? {
                self.cursor = 0;
                tokio::time::sleep(IDLE_SLEEP).await;
            }
            xcore_supervisor::reap_zombies();
        }
    }

    /// One scan-dispatch step. Returns `false` when the table has no
    /// more undone rows past the cursor (the caller should idle-sleep).
    pub async fn tick(&mut self) -> Result<bool, EngineError> {
        let mut tx = self.env.store.begin().await?;
        let next = tx.allocate_id(self.cursor).await?;
        let Some(job_id) = next else {
            tx.rollback().await?;
            return Ok(false);
        };
        self.cursor = job_id.get();

        let mut job = tx.fetch(job_id).await?;
        let Some(kind) = job.kind().map(str::to_string) else {
            let code = EngineError::MissingKind(job_id).as_result_code();
            warn!(job_id = job_id.get(), code, "job has no arg0, terminating as DONE");
            finish(&mut tx, self.env.clock.as_ref(), &mut job, code, &[]).await?;
            tx.commit().await?;
            return Ok(true);
        };

        let Some(proc) = self.env.processors.get(&kind) else {
            let code = EngineError::NoProcessor(kind.clone()).as_result_code();
            error!(job_id = job_id.get(), kind, code, "no processor registered, terminating as DONE");
            finish(&mut tx, self.env.clock.as_ref(), &mut job, code, &[]).await?;
            tx.commit().await?;
            return Ok(true);
        };

        if let Err(e) = tx.lock_tree(job.root).await {
            debug!(job_id = job_id.get(), error = %e, "tree lock contended, revisiting next tick");
            tx.rollback().await?;
            return Ok(true);
        }

        let outcome = {
            let mut ctx = ProcCtx {
                tx: &mut tx,
                clock: self.env.clock.as_ref(),
                workdir: &self.env.workdir,
                registry: &self.env.registry,
                supervisor: &self.env.supervisor,
            };
            proc.run(&mut ctx, job_id).await
        };

        match outcome {
            Ok(()) => {
                tx.commit().await?;
            }
            Err(e) if e.is_transient() => {
                debug!(job_id = job_id.get(), error = %e, "transient error, rolling back");
                tx.rollback().await?;
            }
            Err(e) => {
                error!(job_id = job_id.get(), error = %e, "processor failed");
                tx.rollback().await?;
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
