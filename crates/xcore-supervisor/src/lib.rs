// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Plugin supervisor: fork/exec a chosen plugin under its working
//! directory, track its pid, and poll for exit without blocking the
//! dispatcher.
//!
//! Strictly one child per job at a time — a processor must not spawn a
//! new child while a prior one's pid is still live.

mod reaper;
mod supervisor;

pub use reaper::{reap_zombies, sigchld_pending, take_sigchld};
pub use supervisor::{PollOutcome, Supervisor, SupervisorError};
