// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance guard: an exclusive advisory lock on a file under
//! `run_path`, held for the process lifetime. The broker is specified
//! as single-process-per-deployment, so a second instance starting
//! against the same run directory must fail fast rather than race the
//! first over the job table.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use fs2::FileExt;

pub struct BrokerLock {
    #[allow(dead_code)]
    file: File,
}

impl BrokerLock {
    pub fn acquire(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(path)?;
        file.try_lock_exclusive().map_err(|_| {
            io::Error::new(
                io::ErrorKind::WouldBlock,
                format!("another xcore broker already holds {}", path.display()),
            )
        })?;
        Ok(BrokerLock { file })
    }
}
