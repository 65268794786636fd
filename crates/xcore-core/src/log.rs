// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured per-job audit log: a JSON array of transition records
//! stored in the row's `log` column, bounded to ~4 KiB and fail-closed
//! on overflow so a half-written blob is never persisted.

use crate::id::JobId;
use crate::state::SchedState;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Upper bound on the serialized `log` column, matching the `jobs.log`
/// text column's practical size.
pub const MAX_LOG_BYTES: usize = 4096;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogError {
    #[error("log record would exceed the {0} byte bound")]
    Overflow(usize),
    #[error("malformed log blob: {0}")]
    Malformed(String),
}

/// One state-transition record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub who: JobId,
    pub proc: String,
    pub state_before: SchedState,
    pub state_after: SchedState,
    pub unix_ts: i64,
    pub status: i32,
    #[serde(default)]
    pub msg_object: Value,
}

/// In-memory view of a job's `log` column: an ordered list of records
/// that round-trips through JSON and enforces the size bound on append.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobLog {
    records: Vec<LogRecord>,
}

impl JobLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an existing `log` column value. An empty string is treated
    /// as an empty log (the column's default before any transition).
    pub fn parse(blob: &str) -> Result<Self, LogError> {
        if blob.trim().is_empty() {
            return Ok(Self::default());
        }
        let records: Vec<LogRecord> =
            serde_json::from_str(blob).map_err(|e| LogError::Malformed(e.to_string()))?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Serialize back to the column representation.
    pub fn to_blob(&self) -> String {
        serde_json::to_string(&self.records).expect("LogRecord is always serializable")
    }

    /// Append a record with extra `msg_object` key/value pairs merged
    /// in, plus a conventional `errmsg` field when `status != 0`.
    ///
    /// On overflow the log is left unmodified and an error is returned;
    /// callers must roll back the whole transition rather than persist
    /// a truncated blob.
    pub fn append(
        &mut self,
        mut record: LogRecord,
        extra_kv: &[(&str, Value)],
        errmsg: Option<&str>,
    ) -> Result<(), LogError> {
        let obj = match &mut record.msg_object {
            Value::Object(m) => m,
            other @ Value::Null => {
                *other = Value::Object(Map::new());
                other.as_object_mut().expect("just assigned an object")
            }
            _ => return Err(LogError::Malformed("msg_object must be an object".into())),
        };
        for (k, v) in extra_kv {
            obj.insert((*k).to_string(), v.clone());
        }
        if record.status != 0 {
            if let Some(msg) = errmsg {
                obj.insert("errmsg".to_string(), Value::String(msg.to_string()));
            }
        }

        let mut candidate = self.records.clone();
        candidate.push(record);
        let serialized =
            serde_json::to_string(&candidate).expect("LogRecord is always serializable");
        if serialized.len() > MAX_LOG_BYTES {
            return Err(LogError::Overflow(MAX_LOG_BYTES));
        }

        self.records = candidate;
        Ok(())
    }

    /// JSON-pointer-style lookup into the last record's `msg_object`,
    /// used by schedulers to recover a prior instance's timestamps.
    pub fn value_at(&self, path: &crate::path::Path) -> Option<&Value> {
        let last = self.records.last()?;
        path.resolve(&last.msg_object, &[]).ok().flatten()
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
