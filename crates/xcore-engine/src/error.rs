// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use xcore_core::JobId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] xcore_storage::StorageError),
    #[error(transparent)]
    Registry(#[from] xcore_registry::RegistryError),
    #[error(transparent)]
    WorkDir(#[from] xcore_workdir::WorkDirError),
    #[error(transparent)]
    Supervisor(#[from] xcore_supervisor::SupervisorError),
    #[error(transparent)]
    Core(#[from] xcore_core::Error),
    #[error("no processor registered for job kind '{0}'")]
    NoProcessor(String),
    #[error("job {0} has no arg0 (processor name)")]
    MissingKind(JobId),
}

impl EngineError {
    /// Transient errors roll back silently and revisit the row next
    /// tick; everything else gets a log entry and, for the programmer/
    /// configuration class, moves the job straight to `DONE`.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::Storage(e) if e.is_transient())
    }

    /// The `result` column value this error should produce when it
    /// terminates a job, per the broker-domain error taxonomy.
    pub fn as_result_code(&self) -> i32 {
        match self {
            EngineError::Core(e) => e.code(),
            EngineError::NoProcessor(_) => xcore_core::Error::ENoProc.code(),
            EngineError::MissingKind(_) => xcore_core::Error::EInvRec.code(),
            EngineError::Registry(xcore_registry::RegistryError::Core(e)) => e.code(),
            EngineError::WorkDir(_) => xcore_core::Error::EEnvJ.code(),
            EngineError::Supervisor(xcore_supervisor::SupervisorError::Core(e)) => e.code(),
            EngineError::Supervisor(_) => xcore_core::Error::ESpawnJ.code(),
            EngineError::Storage(xcore_storage::StorageError::Core(e)) => e.code(),
            EngineError::Storage(xcore_storage::StorageError::NotFound(_)) => {
                xcore_core::Error::EInvRec.code()
            }
            EngineError::Storage(_) => xcore_core::Error::EdbConn.code(),
            EngineError::Registry(_) => xcore_core::Error::EConf.code(),
        }
    }
}
