// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path mini-language for descending into `serde_json::Value` trees.
//!
//! Grammar: a path is a sequence of segments, each either
//! - `.key`    — object field descent
//! - `[index]` — array element descent (non-negative decimal)
//! - `#`       — a positional integer argument, substituted at resolve
//!               time and then used as an array index
//! - `$`       — a positional string argument, substituted at resolve
//!               time and then used as an object key
//!
//! This is the idiomatic replacement for the excluded JSON-tree utility
//! library's path support; it does not autovivify — resolving a missing
//! path returns `None`, it never creates the path.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("empty path")]
    Empty,
    #[error("unexpected character '{0}' at offset {1}")]
    UnexpectedChar(char, usize),
    #[error("unterminated '[' index")]
    UnterminatedIndex,
    #[error("invalid array index '{0}'")]
    InvalidIndex(String),
    #[error("not enough arguments supplied for placeholders")]
    MissingArg,
    #[error("wrong argument type for placeholder at position {0}")]
    WrongArgType(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
    IntArg,
    StrArg,
}

/// A positional argument supplied to resolve `#`/`$` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Int(i64),
    Str(String),
}

/// A parsed path mini-language expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Parse a path expression. Leading `.` is optional (`.a.b` == `a.b`).
    pub fn parse(spec: &str) -> Result<Path, PathError> {
        if spec.is_empty() {
            return Err(PathError::Empty);
        }
        let chars: Vec<char> = spec.chars().collect();
        let mut i = 0;
        let mut segments = Vec::new();

        while i < chars.len() {
            match chars[i] {
                '.' => {
                    i += 1;
                    let start = i;
                    while i < chars.len() && chars[i] != '.' && chars[i] != '[' {
                        i += 1;
                    }
                    if i == start {
                        return Err(PathError::UnexpectedChar(chars[i.min(chars.len() - 1)], i));
                    }
                    segments.push(Segment::Key(chars[start..i].iter().collect()));
                }
                '[' => {
                    i += 1;
                    let start = i;
                    while i < chars.len() && chars[i] != ']' {
                        i += 1;
                    }
                    if i >= chars.len() {
                        return Err(PathError::UnterminatedIndex);
                    }
                    let raw: String = chars[start..i].iter().collect();
                    let idx: usize = raw
                        .parse()
                        .map_err(|_| PathError::InvalidIndex(raw.clone()))?;
                    segments.push(Segment::Index(idx));
                    i += 1; // skip ']'
                }
                '#' => {
                    segments.push(Segment::IntArg);
                    i += 1;
                }
                '$' => {
                    segments.push(Segment::StrArg);
                    i += 1;
                }
                c if segments.is_empty() => {
                    // Leading bare key without a '.' prefix.
                    let start = i;
                    while i < chars.len() && chars[i] != '.' && chars[i] != '[' {
                        i += 1;
                    }
                    let _ = c;
                    segments.push(Segment::Key(chars[start..i].iter().collect()));
                }
                c => return Err(PathError::UnexpectedChar(c, i)),
            }
        }

        Ok(Path { segments })
    }

    /// Resolve this path against `root`, consuming `args` in order for
    /// each `#`/`$` placeholder encountered. Returns `None` if any
    /// segment fails to descend (missing key, out-of-range index, type
    /// mismatch); returns an error only for a malformed argument list.
    pub fn resolve<'v>(
        &self,
        root: &'v Value,
        args: &[Arg],
    ) -> Result<Option<&'v Value>, PathError> {
        let mut current = root;
        let mut arg_pos = 0usize;

        for seg in &self.segments {
            let next = match seg {
                Segment::Key(k) => current.get(k),
                Segment::Index(i) => current.get(i),
                Segment::IntArg => {
                    let arg = args.get(arg_pos).ok_or(PathError::MissingArg)?;
                    arg_pos += 1;
                    match arg {
                        Arg::Int(n) => current.get(*n as usize),
                        Arg::Str(_) => return Err(PathError::WrongArgType(arg_pos - 1)),
                    }
                }
                Segment::StrArg => {
                    let arg = args.get(arg_pos).ok_or(PathError::MissingArg)?;
                    arg_pos += 1;
                    match arg {
                        Arg::Str(s) => current.get(s.as_str()),
                        Arg::Int(_) => return Err(PathError::WrongArgType(arg_pos - 1)),
                    }
                }
            };
            match next {
                Some(v) => current = v,
                None => return Ok(None),
            }
        }

        Ok(Some(current))
    }
}
