// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridges [`xcore_core::log::JobLog`] to the `log` text column: parse,
//! append, write back, all within the caller's transaction.

use serde_json::Value;
use xcore_core::log::{JobLog, LogRecord};
use xcore_core::JobId;

use crate::column::StringColumn;
use crate::error::StorageError;
use crate::store::Tx;

/// Append one transition record to `id`'s log column. On overflow the
/// column is left untouched and the error propagates so the caller
/// rolls back the whole transition.
pub async fn append_log(
    tx: &mut Tx,
    id: JobId,
    record: LogRecord,
    extra_kv: &[(&str, Value)],
    errmsg: Option<&str>,
) -> Result<(), StorageError> {
    let blob = tx.get_string(StringColumn::Log, id).await?;
    let mut log = JobLog::parse(&blob)?;
    log.append(record, extra_kv, errmsg)?;
    tx.update_string(StringColumn::Log, id, &log.to_blob())
        .await?;
    Ok(())
}

pub async fn read_log(tx: &mut Tx, id: JobId) -> Result<JobLog, StorageError> {
    let blob = tx.get_string(StringColumn::Log, id).await?;
    Ok(JobLog::parse(&blob)?)
}
