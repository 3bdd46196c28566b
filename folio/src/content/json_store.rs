// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::ContentError;

const MAX_TEMP_ATTEMPTS: u32 = 100;

pub(crate) fn read_json_file(path: &Path, label: &str) -> Result<Option<Value>, ContentError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|err| ContentError::Storage(format!("Failed to read {} file: {}", label, err)))?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    let decoded = serde_json::from_str(&content)
        .map_err(|err| ContentError::Storage(format!("Failed to parse {} file: {}", label, err)))?;
    Ok(Some(decoded))
}

/// Replaces `path` via a synced temp file and rename. On error the previous file is untouched.
pub(crate) fn write_json_file(path: &Path, label: &str, value: &Value) -> Result<(), ContentError> {
    let mut content = serde_json::to_string_pretty(value)
        .map_err(|err| ContentError::Storage(format!("Failed to serialize {}: {}", label, err)))?;
    content.push('\n');

    let parent = path.parent().ok_or_else(|| {
        ContentError::Storage(format!("{} file path has no parent directory", label))
    })?;
    fs::create_dir_all(parent).map_err(|err| {
        ContentError::Storage(format!("Failed to create {} directory: {}", label, err))
    })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ContentError::Storage(format!("{} file path has no file name", label)))?;
    let (mut file, temp_path) = create_temp_file(parent, file_name, label)?;

    if let Err(err) = file.write_all(content.as_bytes()) {
        let _ = fs::remove_file(&temp_path);
        return Err(ContentError::Storage(format!(
            "Failed to write {} temp file: {}",
            label, err
        )));
    }
    if let Err(err) = file.sync_all() {
        let _ = fs::remove_file(&temp_path);
        return Err(ContentError::Storage(format!(
            "Failed to sync {} temp file: {}",
            label, err
        )));
    }
    drop(file);

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(ContentError::Storage(format!(
            "Failed to replace {} file: {}",
            label, err
        )));
    }

    #[cfg(unix)]
    {
        if let Err(err) = fs::File::open(parent).and_then(|dir| dir.sync_all()) {
            log::warn!("{} directory sync failed: {}", label, err);
        }
    }

    Ok(())
}

fn create_temp_file(
    parent: &Path,
    file_name: &str,
    label: &str,
) -> Result<(fs::File, PathBuf), ContentError> {
    for attempt in 0..MAX_TEMP_ATTEMPTS {
        let temp_path = parent.join(format!(
            ".{}.tmp.{}.{}",
            file_name,
            std::process::id(),
            attempt
        ));
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
        {
            Ok(file) => return Ok((file, temp_path)),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(ContentError::Storage(format!(
                    "Failed to create temp {} file: {}",
                    label, err
                )));
            }
        }
    }
    Err(ContentError::Storage(format!(
        "Failed to create temp {} file after multiple attempts",
        label
    )))
}
