// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config file found on the search path")]
    NotFound,
    #[error("failed to load {0}: {1}")]
    Load(std::path::PathBuf, ini::Error),
    #[error("missing required key '{section}:{key}'")]
    MissingKey { section: String, key: String },
    #[error("invalid value for '{section}:{key}': {reason}")]
    InvalidValue {
        section: String,
        key: String,
        reason: String,
    },
}

impl From<ConfigError> for xcore_core::Error {
    fn from(_: ConfigError) -> Self {
        xcore_core::Error::EConf
    }
}
