// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::debug;

use crate::error::ConfigError;

const SEARCH_PATH: &[&str] = &["./snappy.conf", "/etc/snappy.conf"];

/// Typed view over the broker's INI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    database_server: String,
    database_user: String,
    database_pass: String,
    database_port: u16,
    run_path: PathBuf,
    log_path: PathBuf,
    broker_home: PathBuf,
    plugin_home: PathBuf,
}

impl Config {
    /// Resolve the search path in order: `./snappy.conf`,
    /// `/etc/snappy.conf`, `<broker_home>/etc/xcore.conf` — the install
    /// path is only probed once `broker_home` is otherwise known, so in
    /// practice the first two entries are consulted, falling back to
    /// `XCORE_BROKER_HOME/etc/xcore.conf` when set.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::resolve_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading configuration");
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Load(path.to_owned(), e))?;

        let broker_home = PathBuf::from(required(&ini, "xcore", "broker_home")?);

        Ok(Config {
            database_server: required(&ini, "database", "server")?.to_string(),
            database_user: required(&ini, "database", "user")?.to_string(),
            database_pass: required(&ini, "database", "pass")?.to_string(),
            database_port: parse_required(&ini, "database", "port")?,
            run_path: PathBuf::from(required(&ini, "xcore", "run_path")?),
            log_path: PathBuf::from(required(&ini, "xcore", "log")?),
            plugin_home: PathBuf::from(required(&ini, "plugin", "plugin_home")?),
            broker_home,
        })
    }

    fn resolve_path() -> Result<PathBuf, ConfigError> {
        for candidate in SEARCH_PATH {
            let p = PathBuf::from(candidate);
            if p.exists() {
                return Ok(p);
            }
        }
        if let Ok(home) = std::env::var("XCORE_BROKER_HOME") {
            let p = PathBuf::from(home).join("etc/xcore.conf");
            if p.exists() {
                return Ok(p);
            }
        }
        Err(ConfigError::NotFound)
    }

    pub fn database_server(&self) -> &str {
        &self.database_server
    }

    pub fn database_user(&self) -> &str {
        &self.database_user
    }

    pub fn database_pass(&self) -> &str {
        &self.database_pass
    }

    pub fn database_port(&self) -> u16 {
        self.database_port
    }

    pub fn run_path(&self) -> &Path {
        &self.run_path
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn broker_home(&self) -> &Path {
        &self.broker_home
    }

    pub fn plugin_home(&self) -> &Path {
        &self.plugin_home
    }
}

fn required<'a>(ini: &'a Ini, section: &str, key: &str) -> Result<&'a str, ConfigError> {
    ini.section(Some(section))
        .and_then(|s| s.get(key))
        .ok_or_else(|| ConfigError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        })
}

fn parse_required<T: std::str::FromStr>(
    ini: &Ini,
    section: &str,
    key: &str,
) -> Result<T, ConfigError> {
    let raw = required(ini, section, key)?;
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("'{raw}' is not a valid value"),
    })
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
