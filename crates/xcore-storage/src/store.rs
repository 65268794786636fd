// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySql, MySqlPool, Row};
use tracing::debug;
use xcore_core::job::JobConfig;
use xcore_core::state::SchedState;
use xcore_core::{Job, JobId, Policy, State};

use crate::column::{IntColumn, StringColumn};
use crate::error::StorageError;
use crate::row::{JobRow, PartialRow};

const SELECT_COLUMNS: &str =
    "id, sub, next, parent, grp, root, state, done, result, policy, feid, \
     arg0, arg1, arg2, arg3, arg4, arg5, arg6, arg7";

/// Structural-only view of a row, for cheap sibling checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialJob {
    pub id: JobId,
    pub sub: JobId,
    pub next: JobId,
    pub parent: JobId,
    pub grp: JobId,
    pub root: JobId,
    pub state: State,
    pub done: bool,
    pub result: i32,
    pub policy: Policy,
}

impl PartialRow {
    fn into_partial(self) -> Result<PartialJob, StorageError> {
        let id = JobId::new(self.id);
        let state = State::decode(self.state).ok_or(StorageError::InvalidState(id))?;
        Ok(PartialJob {
            id,
            sub: JobId::new(self.sub),
            next: JobId::new(self.next),
            parent: JobId::new(self.parent),
            grp: JobId::new(self.grp),
            root: JobId::new(self.root),
            state,
            done: self.done,
            result: self.result,
            policy: Policy(self.policy),
        })
    }
}

/// One dispatcher-tick transaction, holding the tree lock once acquired.
pub struct Tx(sqlx::Transaction<'static, MySql>);

impl Tx {
    /// Acquire the job-tree lock: a `SELECT ... FOR UPDATE` over every
    /// row sharing `root`, with the session's lock-wait timeout pinned
    /// to 1 second so a contended tree is skipped this tick.
    pub async fn lock_tree(&mut self, root: JobId) -> Result<(), StorageError> {
        sqlx::query("SET innodb_lock_wait_timeout = 1")
            .execute(&mut *self.0)
            .await?;
        sqlx::query("SELECT id FROM jobs WHERE root = ? FOR UPDATE")
            .bind(root.get())
            .fetch_all(&mut *self.0)
            .await?;
        Ok(())
    }

    pub async fn fetch(&mut self, id: JobId) -> Result<Job, StorageError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM jobs WHERE id = ?");
        let row: JobRow = sqlx::query_as(&sql)
            .bind(id.get())
            .fetch_optional(&mut *self.0)
            .await?
            .ok_or(StorageError::NotFound(id))?;
        row.into_job()
    }

    pub async fn fetch_partial(&mut self, id: JobId) -> Result<PartialJob, StorageError> {
        let row: PartialRow = sqlx::query_as(
            "SELECT id, sub, next, parent, grp, root, state, done, result, policy \
             FROM jobs WHERE id = ?",
        )
        .bind(id.get())
        .fetch_optional(&mut *self.0)
        .await?
        .ok_or(StorageError::NotFound(id))?;
        row.into_partial()
    }

    /// Creates a row, then self-roots it (`parent = grp = root = id`).
    pub async fn insert(&mut self, cfg: JobConfig) -> Result<JobId, StorageError> {
        let state = cfg.state.unwrap_or_else(|| State::new(SchedState::Created));
        let policy = cfg.policy();
        let result = sqlx::query(
            "INSERT INTO jobs \
             (sub, next, parent, grp, root, state, done, result, policy, feid, \
              arg0, arg1, arg2, arg3, arg4, arg5, arg6, arg7) \
             VALUES (0, 0, 0, 0, 0, ?, ?, 0, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(state.encode())
        .bind(state.sched.is_done())
        .bind(policy.0)
        .bind(&cfg.feid)
        .bind(&cfg.args[0])
        .bind(&cfg.args[1])
        .bind(&cfg.args[2])
        .bind(&cfg.args[3])
        .bind(&cfg.args[4])
        .bind(&cfg.args[5])
        .bind(&cfg.args[6])
        .bind(&cfg.args[7])
        .execute(&mut *self.0)
        .await?;

        let id = result.last_insert_id() as i32;
        sqlx::query("UPDATE jobs SET parent = ?, grp = ?, root = ? WHERE id = ?")
            .bind(id)
            .bind(id)
            .bind(id)
            .bind(id)
            .execute(&mut *self.0)
            .await?;
        debug!(job_id = id, "inserted self-rooted job");
        Ok(JobId::new(id))
    }

    /// Writes tree links, state, done, result, and policy in one
    /// statement — the only way a processor mutates structural fields.
    pub async fn update_structural(&mut self, job: &Job) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE jobs SET sub = ?, next = ?, parent = ?, grp = ?, root = ?, \
             state = ?, done = ?, result = ?, policy = ? WHERE id = ?",
        )
        .bind(job.sub.get())
        .bind(job.next.get())
        .bind(job.parent.get())
        .bind(job.grp.get())
        .bind(job.root.get())
        .bind(job.state.encode())
        .bind(job.done)
        .bind(job.result)
        .bind(job.policy.0)
        .bind(job.id.get())
        .execute(&mut *self.0)
        .await?;
        Ok(())
    }

    pub async fn update_string(
        &mut self,
        col: StringColumn,
        id: JobId,
        val: &str,
    ) -> Result<(), StorageError> {
        let sql = format!("UPDATE jobs SET {} = ? WHERE id = ?", col.name());
        sqlx::query(&sql)
            .bind(val)
            .bind(id.get())
            .execute(&mut *self.0)
            .await?;
        Ok(())
    }

    pub async fn get_string(&mut self, col: StringColumn, id: JobId) -> Result<String, StorageError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = ?", col.name());
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&mut *self.0)
            .await?
            .ok_or(StorageError::NotFound(id))?;
        Ok(row.try_get::<Option<String>, _>(0)?.unwrap_or_default())
    }

    pub async fn update_int(
        &mut self,
        col: IntColumn,
        id: JobId,
        val: i32,
    ) -> Result<(), StorageError> {
        let sql = format!("UPDATE jobs SET {} = ? WHERE id = ?", col.name());
        sqlx::query(&sql)
            .bind(val)
            .bind(id.get())
            .execute(&mut *self.0)
            .await?;
        Ok(())
    }

    pub async fn get_int(&mut self, col: IntColumn, id: JobId) -> Result<i32, StorageError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = ?", col.name());
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&mut *self.0)
            .await?
            .ok_or(StorageError::NotFound(id))?;
        Ok(row.try_get(0)?)
    }

    /// Count of children still in progress (`done = 0`), the corrected
    /// reading of the legacy "check if ready" query.
    pub async fn count_undone_subs(&mut self, parent_id: JobId) -> Result<i64, StorageError> {
        let row = sqlx::query(
            "SELECT COUNT(id) FROM jobs WHERE parent = ? AND id != parent AND done = 0",
        )
        .bind(parent_id.get())
        .fetch_one(&mut *self.0)
        .await?;
        Ok(row.try_get(0)?)
    }

    /// `SELECT MIN(id) WHERE done = 0 AND id > cursor`, the dispatcher's
    /// resume-scan query.
    pub async fn allocate_id(&mut self, cursor: i32) -> Result<Option<JobId>, StorageError> {
        let row = sqlx::query("SELECT MIN(id) FROM jobs WHERE done = 0 AND id > ?")
            .bind(cursor)
            .fetch_one(&mut *self.0)
            .await?;
        let id: Option<i32> = row.try_get(0)?;
        Ok(id.map(JobId::new))
    }

    pub async fn commit(self) -> Result<(), StorageError> {
        self.0.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), StorageError> {
        self.0.rollback().await?;
        Ok(())
    }
}

/// Connection pool over the shared `jobs` table.
#[derive(Debug, Clone)]
pub struct JobStore {
    pool: MySqlPool,
}

impl JobStore {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(JobStore { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        JobStore { pool }
    }

    /// Open a transaction. All mutation for a single dispatcher tick
    /// happens within it; the caller commits on processor success or
    /// rolls back on any error.
    pub async fn begin(&self) -> Result<Tx, StorageError> {
        Ok(Tx(self.pool.begin().await?))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
