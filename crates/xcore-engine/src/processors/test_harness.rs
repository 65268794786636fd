// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared scaffolding for the processor integration tests: a real
//! MySQL-backed [`JobStore`], a throwaway plugin directory, and a
//! working-directory root under a tempdir. These tests fork/exec a
//! genuine shell-script "plugin" and talk to a live database, so they
//! are marked `#[ignore]` like the storage crate's own integration
//! tests; run them with `DATABASE_URL` set against a disposable MySQL
//! instance.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::TempDir;
use xcore_core::clock::FakeClock;
use xcore_registry::Registry;
use xcore_storage::JobStore;
use xcore_supervisor::Supervisor;
use xcore_workdir::WorkDirManager;

pub(crate) struct Harness {
    pub store: JobStore,
    pub workdir: WorkDirManager,
    pub registry: Registry,
    pub supervisor: Supervisor,
    pub clock: FakeClock,
    _tmp: TempDir,
}

/// A shell script registered under plugin name `name`, exiting with
/// `meta/status = 0` and echoing its input JSON back as `meta/arg.out`
/// unchanged — good enough to exercise the stage state machine, and it
/// preserves `sp_name`/`tp_name` across the handoff to the next stage.
fn write_plugin(plugin_root: &Path, name: &str, id: i32) {
    let dir = plugin_root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("info"),
        format!("name={name}\nid={id}\nexec=run.sh\n"),
    )
    .unwrap();
    let script = dir.join("run.sh");
    fs::write(
        &script,
        "#!/bin/sh\ncat meta/arg > meta/arg.out\necho 0 > meta/status\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
}

pub(crate) async fn harness() -> Harness {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must point at a disposable MySQL instance for these tests");
    let tmp = TempDir::new().unwrap();
    let plugin_root = tmp.path().join("plugins");
    fs::create_dir_all(&plugin_root).unwrap();
    write_plugin(&plugin_root, "dummy", 1);

    Harness {
        store: JobStore::connect(&url).await.unwrap(),
        workdir: WorkDirManager::new(tmp.path().join("run")),
        registry: Registry::scan(&plugin_root).unwrap(),
        supervisor: Supervisor::new(),
        clock: FakeClock::new(0),
        _tmp: tmp,
    }
}
