// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::ffi::CString;
use std::path::Path;

use nix::sys::signal::kill;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{chdir, execve, fork, ForkResult, Pid};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};
use xcore_core::{Error as CoreError, JobId};
use xcore_workdir::{WorkDirError, WorkDirManager};

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("fork failed: {0}")]
    Fork(nix::Error),
    #[error("chdir to {0} failed: {1}")]
    Chdir(std::path::PathBuf, nix::Error),
    #[error("exec of {0} failed: {1}")]
    Exec(std::path::PathBuf, nix::Error),
    #[error(transparent)]
    WorkDir(#[from] WorkDirError),
    #[error("arg.out is not valid JSON: {0}")]
    MalformedOutput(serde_json::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// The result of polling a job's child process.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Running,
    Exited { status: i32, arg_out: Value },
}

/// Forks and execs plugin binaries, one child per job at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct Supervisor;

impl Supervisor {
    pub fn new() -> Self {
        Supervisor
    }

    /// Fork, `chdir` the child into `working_dir`, and exec `exec_path`
    /// with an empty environment and `argv = [exec_path]`. Returns the
    /// child's pid to the parent.
    ///
    /// # Safety
    /// Calls `fork()`; the child path performs only `chdir`/`execve`/
    /// `_exit`, which are async-signal-safe operations appropriate for
    /// the post-fork child.
    pub fn spawn(&self, exec_path: &Path, working_dir: &Path) -> Result<i32, SupervisorError> {
        // SAFETY: the child branch calls only chdir/execve, both
        // async-signal-safe, and never returns to Rust-level code that
        // could violate fork safety (no allocation beyond what execve
        // itself needs, no locks held across the fork).
        match unsafe { fork() }.map_err(SupervisorError::Fork)? {
            ForkResult::Parent { child } => Ok(child.as_raw()),
            ForkResult::Child => {
                if chdir(working_dir).is_err() {
                    unsafe { libc::_exit(127) };
                }
                let path = match CString::new(exec_path.as_os_str().to_string_lossy().as_bytes())
                {
                    Ok(p) => p,
                    Err(_) => unsafe { libc::_exit(127) },
                };
                let argv = [path.clone()];
                let envp: [CString; 0] = [];
                let _ = execve(&path, &argv, &envp);
                // execve only returns on failure.
                unsafe { libc::_exit(127) };
            }
        }
    }

    /// Test liveness with `kill(pid, 0)`. If dead, reap with a
    /// non-blocking `waitpid` (a no-op if the global reaper already
    /// harvested it), then read back `meta/status`/`meta/arg.out`.
    /// Absence of `meta/status` surfaces as [`CoreError::EBadJ`] — a
    /// lost child.
    pub fn poll(
        &self,
        job_id: JobId,
        pid: i32,
        workdir: &WorkDirManager,
    ) -> Result<PollOutcome, SupervisorError> {
        let nix_pid = Pid::from_raw(pid);
        if kill(nix_pid, None).is_ok() {
            return Ok(PollOutcome::Running);
        }

        match waitpid(nix_pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(_) | Err(nix::Error::ECHILD) => {}
            Err(e) => info!(job_id = job_id.get(), error = %e, "waitpid probe failed"),
        }

        let status = match workdir.read_kv_int(job_id, "status") {
            Ok(s) => s as i32,
            Err(WorkDirError::NotFound(_)) => {
                error!(job_id = job_id.get(), "lost child: meta/status absent");
                return Err(SupervisorError::Core(CoreError::EBadJ));
            }
            Err(e) => return Err(e.into()),
        };

        let raw_out = workdir.read_kv_string(job_id, "arg.out")?;
        let arg_out: Value =
            serde_json::from_str(&raw_out).map_err(SupervisorError::MalformedOutput)?;

        Ok(PollOutcome::Exited { status, arg_out })
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
