// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Typed CRUD over the shared `jobs` table, within transactions, with
//! a per-tree `SELECT ... FOR UPDATE` advisory lock.

mod column;
mod error;
mod log_store;
mod row;
mod store;

pub use column::{IntColumn, StringColumn};
pub use error::StorageError;
pub use log_store::{append_log, read_log};
pub use store::{JobStore, PartialJob, Tx};
