// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use xcore_core::Error as CoreError;

use crate::descriptor::{Descriptor, DescriptorError};

/// Upper bound on registered plugins, matching the scanning contract.
pub const MAX_PLUGINS: usize = 64;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read plugin root {0}: {1}")]
    ReadDir(PathBuf, std::io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// The descriptor(s) resolved for a stage's plugin argument JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chosen {
    pub source: Option<Descriptor>,
    pub target: Option<Descriptor>,
}

/// Enumerated plugin descriptors, keyed for O(n) lookup as the bounded
/// table size makes a hash index unnecessary.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<Descriptor>,
}

impl Registry {
    /// Scan `plugin_root`'s immediate subdirectories for readable `info`
    /// descriptors. A subdirectory without one, or with an invalid one,
    /// is skipped and logged rather than failing the whole scan.
    pub fn scan(plugin_root: &Path) -> Result<Registry, RegistryError> {
        let mut entries = Vec::new();
        let read_dir = std::fs::read_dir(plugin_root)
            .map_err(|e| RegistryError::ReadDir(plugin_root.to_path_buf(), e))?;

        for entry in read_dir.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if entries.len() >= MAX_PLUGINS {
                warn!(path = %path.display(), "plugin registry at capacity, skipping");
                continue;
            }
            match Descriptor::load(&path) {
                Ok(d) => entries.push(d),
                Err(DescriptorError::Load(_, _)) => {
                    // No (or unreadable) descriptor — not every subdirectory is a plugin.
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping invalid plugin descriptor"),
            }
        }

        Ok(Registry { entries })
    }

    pub fn by_name(&self, name: &str) -> Option<&Descriptor> {
        self.entries.iter().find(|d| d.name == name)
    }

    pub fn by_id(&self, id: i32) -> Option<&Descriptor> {
        self.entries.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `.sp_name`/`.tp_name` from a stage's `arg2` JSON. At
    /// least one of the two must be present; each name present must
    /// resolve to a registered plugin.
    pub fn choose(&self, arg_json: &str) -> Result<Chosen, RegistryError> {
        let value: Value =
            serde_json::from_str(arg_json).map_err(|_| RegistryError::Core(CoreError::EArg))?;

        let sp_name = value.get("sp_name").and_then(Value::as_str);
        let tp_name = value.get("tp_name").and_then(Value::as_str);

        if sp_name.is_none() && tp_name.is_none() {
            return Err(RegistryError::Core(CoreError::EIncompArg));
        }

        let resolve = |name: &str| -> Result<Descriptor, RegistryError> {
            self.by_name(name)
                .cloned()
                .ok_or(RegistryError::Core(CoreError::ENoPlug))
        };

        Ok(Chosen {
            source: sp_name.map(resolve).transpose()?,
            target: tp_name.map(resolve).transpose()?,
        })
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
