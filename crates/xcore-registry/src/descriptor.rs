// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("failed to load {0}: {1}")]
    Load(PathBuf, ini::Error),
    #[error("'{0}' missing required field '{1}'")]
    MissingField(PathBuf, &'static str),
    #[error("'{0}' has non-numeric id")]
    InvalidId(PathBuf),
}

/// A plugin's parsed `info` descriptor plus the directory it lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub name: String,
    pub id: i32,
    pub ver: i32,
    pub exec: String,
    pub dir: PathBuf,
}

impl Descriptor {
    /// Load and validate one plugin directory's `info` file. Rejects an
    /// empty `name` or a negative `id` — those directories are skipped
    /// by the caller, not fatal to the whole scan.
    pub fn load(dir: &Path) -> Result<Descriptor, DescriptorError> {
        let info_path = dir.join("info");
        let ini = ini::Ini::load_from_file(&info_path)
            .map_err(|e| DescriptorError::Load(info_path.clone(), e))?;
        let section = ini.section(None::<String>);

        let name = section
            .and_then(|s| s.get("name"))
            .filter(|n| !n.is_empty())
            .ok_or(DescriptorError::MissingField(info_path.clone(), "name"))?
            .to_string();
        let id_raw = section
            .and_then(|s| s.get("id"))
            .ok_or(DescriptorError::MissingField(info_path.clone(), "id"))?;
        let id: i32 = id_raw
            .parse()
            .map_err(|_| DescriptorError::InvalidId(info_path.clone()))?;
        if id < 0 {
            return Err(DescriptorError::InvalidId(info_path.clone()));
        }
        // Unset in most plugin `info` files, same as the reference
        // implementation's own plugin-version accessors, which are
        // unconditional 0 stubs; carried through the data tag regardless.
        let ver: i32 = section
            .and_then(|s| s.get("ver"))
            .map(|v| v.parse().map_err(|_| DescriptorError::InvalidId(info_path.clone())))
            .transpose()?
            .unwrap_or(0);
        let exec = section
            .and_then(|s| s.get("exec"))
            .ok_or(DescriptorError::MissingField(info_path.clone(), "exec"))?
            .to_string();

        Ok(Descriptor {
            name,
            id,
            ver,
            exec,
            dir: dir.to_path_buf(),
        })
    }

    /// Absolute path to the plugin's executable.
    pub fn exec_path(&self) -> PathBuf {
        self.dir.join(&self.exec)
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
