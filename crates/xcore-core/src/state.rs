// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `state` column: a scheduling state in the low byte plus an
//! extra-state bitmask in the upper three bytes. Transitions always
//! preserve the extra bits.

use serde::{Deserialize, Serialize};
use std::fmt;

const SCHED_MASK: i32 = 0xFF;
const EXTRA_MASK: i32 = !SCHED_MASK;

/// One of the six scheduling states. Each is a distinct bit so legacy
/// rows that OR'd two bits together are detectable rather than silently
/// aliased to one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedState {
    Created,
    Done,
    Ready,
    Run,
    Blocked,
    Term,
}

impl SchedState {
    const ALL: [SchedState; 6] = [
        SchedState::Created,
        SchedState::Done,
        SchedState::Ready,
        SchedState::Run,
        SchedState::Blocked,
        SchedState::Term,
    ];

    pub const fn bit(self) -> i32 {
        match self {
            SchedState::Created => 1 << 0,
            SchedState::Done => 1 << 1,
            SchedState::Ready => 1 << 2,
            SchedState::Run => 1 << 3,
            SchedState::Blocked => 1 << 4,
            SchedState::Term => 1 << 5,
        }
    }

    /// Decode the low byte of a `state` column value.
    ///
    /// Returns `None` if the low byte doesn't match exactly one known bit
    /// (a row corrupted by a legacy writer, or a state scheme mismatch).
    pub fn from_bits(low_byte: i32) -> Option<SchedState> {
        Self::ALL.into_iter().find(|s| s.bit() == low_byte)
    }

    /// True for `Done` — the only scheduling state that is also terminal.
    pub fn is_done(self) -> bool {
        matches!(self, SchedState::Done)
    }
}

impl fmt::Display for SchedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SchedState::Created => "created",
            SchedState::Done => "done",
            SchedState::Ready => "ready",
            SchedState::Run => "running",
            SchedState::Blocked => "blocked",
            SchedState::Term => "terminated",
        };
        write!(f, "{s}")
    }
}

/// The upper three bytes of the `state` column: kind-specific flags that
/// every scheduling transition must preserve verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraState(pub i32);

impl ExtraState {
    pub fn bits(self) -> i32 {
        self.0 & EXTRA_MASK
    }
}

/// The full `state` column value, decomposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub sched: SchedState,
    pub extra: ExtraState,
}

impl State {
    pub fn new(sched: SchedState) -> Self {
        Self {
            sched,
            extra: ExtraState::default(),
        }
    }

    pub fn with_extra(sched: SchedState, extra: ExtraState) -> Self {
        Self { sched, extra }
    }

    /// Decode a raw `state` column value.
    pub fn decode(raw: i32) -> Option<State> {
        let sched = SchedState::from_bits(raw & SCHED_MASK)?;
        Some(State {
            sched,
            extra: ExtraState(raw & EXTRA_MASK),
        })
    }

    /// Encode back to the raw `state` column representation.
    pub fn encode(self) -> i32 {
        self.extra.bits() | self.sched.bit()
    }

    /// Produce the successor state with a new scheduling state but the
    /// same extra bits — the invariant every processor transition must
    /// uphold.
    pub fn transition(self, sched: SchedState) -> State {
        State {
            sched,
            extra: self.extra,
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
