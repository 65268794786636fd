// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Closed sets of column names for `UpdateString`/`UpdateInt`/`GetString`/
//! `GetInt`, so per-column access never builds SQL from caller-supplied
//! strings.

/// A text column addressable by `UpdateString`/`GetString`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringColumn {
    Feid,
    Log,
    Arg(usize),
}

impl StringColumn {
    pub(crate) fn name(self) -> String {
        match self {
            StringColumn::Feid => "feid".to_string(),
            StringColumn::Log => "log".to_string(),
            StringColumn::Arg(n) => {
                debug_assert!(n < xcore_core::job::ARG_SLOTS);
                format!("arg{n}")
            }
        }
    }
}

/// An integer column addressable by `UpdateInt`/`GetInt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntColumn {
    Sub,
    Next,
    Parent,
    Grp,
    Root,
    State,
    Result,
    Policy,
}

impl IntColumn {
    pub(crate) fn name(self) -> &'static str {
        match self {
            IntColumn::Sub => "sub",
            IntColumn::Next => "next",
            IntColumn::Parent => "parent",
            IntColumn::Grp => "grp",
            IntColumn::Root => "root",
            IntColumn::State => "state",
            IntColumn::Result => "result",
            IntColumn::Policy => "policy",
        }
    }
}
