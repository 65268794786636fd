// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Per-job working directory: the filesystem surface the broker and a
//! plugin process communicate across.
//!
//! Fixed layout under `<run_root>/<job_id>/`:
//!
//! ```text
//! meta/id          decimal job id
//! meta/cmd         processor name
//! meta/arg         plugin input JSON
//! meta/rstr_arg    restore parameters (get only)
//! meta/pid         child PID after fork
//! meta/status      child exit status (plugin-written)
//! meta/arg.out     plugin output JSON (plugin-written)
//! meta/tag         opaque data-tag blob (export only)
//! meta/log         plugin-owned log file
//! data/            plugin-owned payload directory
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use xcore_core::JobId;

pub const META_DIR: &str = "meta";
pub const DATA_DIR: &str = "data";

#[derive(Debug, Error)]
pub enum WorkDirError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_err(path: &Path, source: std::io::Error) -> WorkDirError {
    if source.kind() == std::io::ErrorKind::NotFound {
        WorkDirError::NotFound(path.display().to_string())
    } else {
        WorkDirError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Operates on working directories rooted at a single `run_root`.
#[derive(Debug, Clone)]
pub struct WorkDirManager {
    run_root: PathBuf,
}

impl WorkDirManager {
    pub fn new(run_root: impl Into<PathBuf>) -> Self {
        Self {
            run_root: run_root.into(),
        }
    }

    pub fn root_of(&self, job_id: JobId) -> PathBuf {
        self.run_root.join(job_id.get().to_string())
    }

    fn meta_path(&self, job_id: JobId, name: &str) -> PathBuf {
        self.root_of(job_id).join(META_DIR).join(name)
    }

    fn data_path(&self, job_id: JobId) -> PathBuf {
        self.root_of(job_id).join(DATA_DIR)
    }

    /// If the directory exists, recursively remove it, then recreate
    /// `run_root/<id>/{meta,data}`.
    pub fn prepare(&self, job_id: JobId) -> Result<(), WorkDirError> {
        let root = self.root_of(job_id);
        if root.exists() {
            fs::remove_dir_all(&root).map_err(|e| io_err(&root, e))?;
        }
        fs::create_dir_all(root.join(META_DIR)).map_err(|e| io_err(&root, e))?;
        fs::create_dir_all(root.join(DATA_DIR)).map_err(|e| io_err(&root, e))?;
        debug!(job_id = job_id.get(), "prepared working directory");
        Ok(())
    }

    /// Rename `<src>/data` into `<dst>/data`, used by `put` to take the
    /// data produced by `export` and by `import` to take the data
    /// produced by `get`. Leaves the source with an empty `data/`.
    pub fn inherit(&self, src: JobId, dst: JobId) -> Result<(), WorkDirError> {
        let src_data = self.data_path(src);
        let dst_data = self.data_path(dst);
        if let Some(parent) = dst_data.parent() {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        if dst_data.exists() {
            fs::remove_dir_all(&dst_data).map_err(|e| io_err(&dst_data, e))?;
        }
        fs::rename(&src_data, &dst_data).map_err(|e| io_err(&src_data, e))?;
        fs::create_dir_all(&src_data).map_err(|e| io_err(&src_data, e))?;
        Ok(())
    }

    pub fn write_kv_string(
        &self,
        job_id: JobId,
        key: &str,
        value: &str,
    ) -> Result<(), WorkDirError> {
        self.write_kv_bytes(job_id, key, value.as_bytes())
    }

    pub fn write_kv_int(&self, job_id: JobId, key: &str, value: i64) -> Result<(), WorkDirError> {
        self.write_kv_string(job_id, key, &value.to_string())
    }

    pub fn write_kv_bytes(
        &self,
        job_id: JobId,
        key: &str,
        value: &[u8],
    ) -> Result<(), WorkDirError> {
        let path = self.meta_path(job_id, key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        fs::write(&path, value).map_err(|e| io_err(&path, e))
    }

    pub fn read_kv_string(&self, job_id: JobId, key: &str) -> Result<String, WorkDirError> {
        let path = self.meta_path(job_id, key);
        fs::read_to_string(&path).map_err(|e| io_err(&path, e))
    }

    pub fn read_kv_int(&self, job_id: JobId, key: &str) -> Result<i64, WorkDirError> {
        let raw = self.read_kv_string(job_id, key)?;
        raw.trim()
            .parse()
            .map_err(|_| WorkDirError::NotFound(format!("{key} is not an integer")))
    }

    /// Recursive removal, invoked as the job transitions to `DONE`.
    pub fn cleanup(&self, job_id: JobId) -> Result<(), WorkDirError> {
        let root = self.root_of(job_id);
        if root.exists() {
            fs::remove_dir_all(&root).map_err(|e| io_err(&root, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
