// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job-kind processors, keyed by the name stored in `arg0` so the
//! dispatcher never hard-wires which kind calls which — registered once
//! at init into a [`ProcessorTable`].

mod bk_single_full;
mod bk_single_sched;
pub(crate) mod common;
mod rstr_single;
mod stage;

#[cfg(test)]
pub(crate) mod test_harness;

use std::collections::HashMap;

use async_trait::async_trait;
use xcore_core::{Clock, JobId};
use xcore_registry::Registry;
use xcore_storage::Tx;
use xcore_supervisor::Supervisor;
use xcore_workdir::WorkDirManager;

use crate::error::EngineError;

/// Everything a processor needs for one dispatch, borrowed for the
/// duration of a single transaction.
pub struct ProcCtx<'a> {
    pub tx: &'a mut Tx,
    pub clock: &'a dyn Clock,
    pub workdir: &'a WorkDirManager,
    pub registry: &'a Registry,
    pub supervisor: &'a Supervisor,
}

/// A job-kind handler: fetch, dispatch on scheduling state, transition,
/// log. Transaction lifetime (begin/commit/rollback) is the dispatcher's
/// job, not the processor's.
#[async_trait]
pub trait Processor: Send + Sync {
    fn kind(&self) -> &'static str;

    async fn run(&self, ctx: &mut ProcCtx<'_>, job_id: JobId) -> Result<(), EngineError>;
}

/// Processors keyed by `arg0`, looked up by name rather than matched in
/// code — the registry that keeps the cyclic kind references (a
/// schedule spawns an instance, an instance spawns stages, a stage
/// spawns the next stage) out of the type graph.
#[derive(Default)]
pub struct ProcessorTable {
    by_name: HashMap<&'static str, Box<dyn Processor>>,
}

impl ProcessorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, proc: Box<dyn Processor>) {
        self.by_name.insert(proc.kind(), proc);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Processor> {
        self.by_name.get(name).map(AsRef::as_ref)
    }

    /// The full set of job kinds this broker understands.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.register(Box::new(bk_single_sched::BkSingleSched));
        table.register(Box::new(bk_single_full::BkSingleFull));
        table.register(Box::new(rstr_single::RstrSingle));
        table.register(Box::new(stage::StageProcessor::snap()));
        table.register(Box::new(stage::StageProcessor::export()));
        table.register(Box::new(stage::StageProcessor::put()));
        table.register(Box::new(stage::StageProcessor::get()));
        table.register(Box::new(stage::StageProcessor::import()));
        table
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
