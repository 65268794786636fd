//! Shared scaffolding for the end-to-end scenario specs: a real
//! MySQL-backed job store, a throwaway plugin directory, and a real
//! [`Dispatcher`] driving [`ProcessorTable::standard`] — as close to
//! the production broker loop as a test can get short of running the
//! `xcore` binary itself. These fork/exec real shell-script plugins and
//! talk to a live database, so every test here is `#[ignore]`; run with
//! `DATABASE_URL` pointed at a disposable MySQL instance.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::sync::Arc;

use tempfile::TempDir;
use xcore_core::clock::FakeClock;
use xcore_core::{Job, JobId};
use xcore_engine::{Dispatcher, DispatcherEnv, ProcessorTable};
use xcore_registry::Registry;
use xcore_storage::JobStore;
use xcore_supervisor::Supervisor;
use xcore_workdir::WorkDirManager;

pub struct Scenario {
    pub store: JobStore,
    pub clock: Arc<FakeClock>,
    plugin_root: std::path::PathBuf,
    run_root: std::path::PathBuf,
    _tmp: TempDir,
}

impl Scenario {
    pub async fn new() -> Self {
        let url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must point at a disposable MySQL instance for these tests");
        let tmp = TempDir::new().unwrap();
        let plugin_root = tmp.path().join("plugins");
        fs::create_dir_all(&plugin_root).unwrap();

        Scenario {
            store: JobStore::connect(&url).await.unwrap(),
            clock: Arc::new(FakeClock::new(0)),
            run_root: tmp.path().join("run"),
            plugin_root,
            _tmp: tmp,
        }
    }

    /// Registers a shell-script plugin that execs unconditionally. `body`
    /// is the script content after the shebang line.
    pub fn write_plugin(&self, name: &str, id: i32, body: &str) {
        let dir = self.plugin_root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("info"),
            format!("name={name}\nid={id}\nexec=run.sh\n"),
        )
        .unwrap();
        let script = dir.join("run.sh");
        fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn plugin_dir(&self, name: &str) -> std::path::PathBuf {
        self.plugin_root.join(name)
    }

    /// The on-disk working directory a job's `meta/*` files live under,
    /// for tests that need to peek at `pid`/`status` directly.
    pub fn workdir_root_of(&self, id: JobId) -> std::path::PathBuf {
        WorkDirManager::new(self.run_root.clone()).root_of(id)
    }

    /// A fresh dispatcher wired against this scenario's store, plugin
    /// registry, and shared clock. Cheap enough to build per tick.
    pub fn dispatcher(&self) -> Dispatcher {
        let env = DispatcherEnv {
            store: self.store.clone(),
            clock: Box::new(Arc::clone(&self.clock)),
            workdir: WorkDirManager::new(self.run_root.clone()),
            registry: Registry::scan(&self.plugin_root).unwrap(),
            supervisor: Supervisor::new(),
            processors: ProcessorTable::standard(),
        };
        Dispatcher::new(env)
    }

    pub async fn fetch(&self, id: JobId) -> Job {
        let mut tx = self.store.begin().await.unwrap();
        let job = tx.fetch(id).await.unwrap();
        tx.rollback().await.unwrap();
        job
    }

    /// Runs ticks (with a short settle delay on idle, so forked plugin
    /// children get a chance to exit) until `done(job)` is true or the
    /// round budget is exhausted.
    pub async fn run_until(&self, id: JobId, max_rounds: u32, done: impl Fn(&Job) -> bool) -> Job {
        let mut dispatcher = self.dispatcher();
        for _ in 0..max_rounds {
            let job = self.fetch(id).await;
            if done(&job) {
                return job;
            }
            if !dispatcher.tick().await.unwrap() {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            }
        }
        self.fetch(id).await
    }
}

pub const ECHO_PLUGIN: &str = "cat meta/arg > meta/arg.out\necho 0 > meta/status";

pub fn exit_with(status: i32) -> String {
    format!("cat meta/arg > meta/arg.out\necho {status} > meta/status")
}
