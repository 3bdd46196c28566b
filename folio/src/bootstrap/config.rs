// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action, log_warning};
use argon2::password_hash::rand_core::{OsRng, RngCore};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const DEFAULT_PORT: u16 = 7080;
const DEFAULT_WORKERS: u16 = 4;
const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
const SECRET_BYTES: usize = 32;
const PASSWORD_BYTES: usize = 12;

pub fn ensure_config(root: &Path) -> Result<bool, BootstrapError> {
    let root_path = normalize_root(root)?;
    let config_path = root_path.join("config.yaml");

    if config_path.exists() {
        return Ok(false);
    }

    let secret = random_hex(SECRET_BYTES);
    let admin_password = random_hex(PASSWORD_BYTES);
    let contents = default_config_yaml(&secret, &admin_password);

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    log_action(format!(
        "created config.yaml (http {}, admin account {})",
        DEFAULT_PORT, DEFAULT_ADMIN_EMAIL
    ));
    log_warning(format!(
        "generated admin password: {} (change auth.admin.password in config.yaml)",
        admin_password
    ));

    Ok(true)
}

fn normalize_root(root: &Path) -> Result<PathBuf, BootstrapError> {
    let root_path = if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root.to_path_buf()
    };

    if root_path.exists() {
        if !root_path.is_dir() {
            return Err(BootstrapError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Runtime root is not a directory: {}", root_path.display()),
            )));
        }
        return Ok(root_path);
    }

    fs::create_dir_all(&root_path)?;
    log_action(format!(
        "created runtime root directory {}",
        root_path.display()
    ));
    Ok(root_path)
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn default_config_yaml(secret: &str, admin_password: &str) -> String {
    format!(
        "server:\n  host: \"0.0.0.0\"\n  port: {port}\n  workers: {workers}\n\nadmin:\n  path: \"/admin\"\n  login_path: \"/admin/login\"\n\nauth:\n  secret: \"{secret}\"\n  session_hours: 168\n  admin:\n    email: \"{admin_email}\"\n    password: \"{admin_password}\"\n    name: \"Administrator\"\n\nstorage:\n  data_dir: \"data\"\n  public_dir: \"public\"\n\nupload:\n  max_file_size_mb: 50\n  max_video_size_mb: 100\n\nbackend: {{}}\n\nlogging:\n  level: \"info\"\n\napp:\n  name: \"Folio\"\n  description: \"Content admin for a consulting website\"\n",
        port = DEFAULT_PORT,
        workers = DEFAULT_WORKERS,
        secret = secret,
        admin_email = DEFAULT_ADMIN_EMAIL,
        admin_password = admin_password,
    )
}
