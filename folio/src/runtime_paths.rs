// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{ConfigError, ValidatedConfig};
use crate::media::MediaFolder;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RuntimePaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub data_dir: PathBuf,
    pub collections_dir: PathBuf,
    pub public_dir: PathBuf,
}

impl RuntimePaths {
    pub fn from_root(root: &Path, config: &ValidatedConfig) -> Result<Self, ConfigError> {
        let root_path = if root.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            root.to_path_buf()
        };

        if !root_path.exists() {
            fs::create_dir_all(&root_path).map_err(|e| {
                ConfigError::ValidationError(format!(
                    "Failed to create runtime root '{}': {}",
                    root_path.display(),
                    e
                ))
            })?;
        }

        let root_canonical = canonicalize(&root_path, "runtime root")?;
        let config_file = root_canonical.join("config.yaml");

        let data_dir = resolve_under(&root_canonical, &config.storage.data_dir);
        let collections_dir = data_dir.join("collections");
        let public_dir = resolve_under(&root_canonical, &config.storage.public_dir);

        ensure_dir_exists(&data_dir)?;
        ensure_dir_exists(&collections_dir)?;
        ensure_dir_exists(&public_dir)?;

        let data_dir = canonicalize(&data_dir, "data directory")?;
        let collections_dir = canonicalize(&collections_dir, "collections directory")?;
        let public_dir = canonicalize(&public_dir, "public directory")?;

        for folder in MediaFolder::ALL {
            ensure_dir_exists(&public_dir.join(folder.dir_name()))?;
        }

        Ok(Self {
            root: root_canonical,
            config_file,
            data_dir,
            collections_dir,
            public_dir,
        })
    }

    pub fn media_dir(&self, folder: MediaFolder) -> PathBuf {
        self.public_dir.join(folder.dir_name())
    }
}

fn resolve_under(root: &Path, configured: &str) -> PathBuf {
    let configured = Path::new(configured);
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}

fn canonicalize(path: &Path, label: &str) -> Result<PathBuf, ConfigError> {
    path.canonicalize().map_err(|e| {
        ConfigError::ValidationError(format!(
            "Failed to canonicalize {} '{}': {}",
            label,
            path.display(),
            e
        ))
    })
}

fn ensure_dir_exists(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Failed to create directory '{}': {}",
                path.display(),
                e
            ))
        })?;
    }

    ensure_dir_writable(path, "Directory must be writable")
}

fn ensure_dir_writable(path: &Path, context: &str) -> Result<(), ConfigError> {
    if !path.is_dir() {
        return Err(ConfigError::ValidationError(format!(
            "{} (not a directory): {}",
            context,
            path.display()
        )));
    }

    let check_path = path.join(format!(".folio-write-check-{}", Uuid::new_v4()));
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&check_path)
    {
        Ok(_) => fs::remove_file(&check_path).map_err(|err| {
            ConfigError::ValidationError(format!(
                "{} (unable to clean write-check file {}): {}",
                context,
                check_path.display(),
                err
            ))
        }),
        Err(err) => Err(ConfigError::ValidationError(format!(
            "{} ({}): {}",
            context,
            path.display(),
            err
        ))),
    }
}
