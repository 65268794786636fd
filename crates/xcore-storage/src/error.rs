// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use xcore_core::JobId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("job {0} not found")]
    NotFound(JobId),
    #[error("row lock timed out, skip this tick")]
    LockTimeout,
    #[error("job {0} has an unrecognized state encoding")]
    InvalidState(JobId),
    #[error(transparent)]
    Log(#[from] xcore_core::log::LogError),
    #[error(transparent)]
    Core(#[from] xcore_core::Error),
}

impl StorageError {
    /// True for the transient class in the error taxonomy: deadlock,
    /// lock-wait timeout, or a row that vanished mid-scan. These never
    /// get a log entry — the tick just rolls back and the row is
    /// revisited.
    pub fn is_transient(&self) -> bool {
        match self {
            StorageError::LockTimeout => true,
            StorageError::Sql(sqlx::Error::Database(e)) => {
                // MySQL 1205 = lock wait timeout, 1213 = deadlock.
                matches!(e.code().as_deref(), Some("1205") | Some("1213"))
            }
            _ => false,
        }
    }
}
