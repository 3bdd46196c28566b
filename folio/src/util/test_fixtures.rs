// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::{ConfigError, ValidatedConfig};
use crate::runtime_paths::RuntimePaths;

/// A runtime root under `target/test-fixtures`, removed on drop.
#[derive(Debug)]
pub struct TestFixtureRoot {
    path: PathBuf,
}

impl TestFixtureRoot {
    pub fn new_unique(prefix: &str) -> std::io::Result<Self> {
        let root = fixtures_root().join(format!("{}-{}", prefix, Uuid::new_v4()));
        fs::create_dir_all(&root)?;
        Ok(Self { path: root })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path.join("data")
    }

    pub fn public_dir(&self) -> PathBuf {
        self.path.join("public")
    }

    pub fn runtime_paths(&self, config: &ValidatedConfig) -> Result<RuntimePaths, ConfigError> {
        RuntimePaths::from_root(&self.path, config)
    }

    /// Every regular file below `dir`, relative to it.
    pub fn list_files(&self, dir: &Path) -> Vec<PathBuf> {
        let mut found = Vec::new();
        collect_files(dir, dir, &mut found);
        found.sort();
        found
    }
}

impl Drop for TestFixtureRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn collect_files(base: &Path, dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(base, &path, found);
        } else if let Ok(relative) = path.strip_prefix(base) {
            found.push(relative.to_path_buf());
        }
    }
}

fn fixtures_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    repo_root.join("target").join("test-fixtures")
}
