// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::{info, warn};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{MediaFolder, UploadError};

const MAX_NAME_ATTEMPTS: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub filename: String,
    pub path: PathBuf,
    pub public_path: String,
    pub size: u64,
}

/// Writes accepted uploads under the public directory, never replacing an existing file.
#[derive(Debug, Clone)]
pub struct AssetStore {
    public_dir: PathBuf,
}

impl AssetStore {
    pub fn new(public_dir: PathBuf) -> Self {
        Self { public_dir }
    }

    pub fn folder_path(&self, folder: MediaFolder) -> PathBuf {
        self.public_dir.join(folder.dir_name())
    }

    /// Writes `bytes` under a name produced by `next_name`; a fresh name is drawn on collision.
    pub async fn write<F>(
        &self,
        folder: MediaFolder,
        mut next_name: F,
        bytes: &[u8],
    ) -> Result<StoredFile, UploadError>
    where
        F: FnMut() -> Result<String, UploadError>,
    {
        let dir = self.folder_path(folder);
        fs::create_dir_all(&dir).await.map_err(|err| {
            UploadError::Storage(format!(
                "Failed to create upload directory '{}': {}",
                dir.display(),
                err
            ))
        })?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let filename = next_name()?;
            let path = dir.join(&filename);
            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => {
                    return Err(UploadError::Storage(format!(
                        "Failed to create '{}': {}",
                        path.display(),
                        err
                    )));
                }
            };

            let written = async {
                file.write_all(bytes).await?;
                file.sync_all().await
            }
            .await;
            if let Err(err) = written {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(UploadError::Storage(format!(
                    "Failed to write '{}': {}",
                    path.display(),
                    err
                )));
            }

            info!(
                "Stored upload {}/{} ({} bytes)",
                folder.dir_name(),
                filename,
                bytes.len()
            );
            return Ok(StoredFile {
                public_path: format!("/{}/{}", folder.dir_name(), filename),
                filename,
                path,
                size: bytes.len() as u64,
            });
        }

        Err(UploadError::Storage(format!(
            "Could not find a free file name in '{}'",
            dir.display()
        )))
    }

    /// Compensating delete for a file written earlier in a failed request.
    pub async fn discard(&self, stored: &StoredFile) {
        match fs::remove_file(&stored.path).await {
            Ok(()) => warn!("Removed orphaned upload {}", stored.public_path),
            Err(err) => warn!(
                "Failed to remove orphaned upload {}: {}",
                stored.public_path, err
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::filename::unique_file_name;

    #[actix_web::test]
    async fn same_original_name_yields_distinct_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = AssetStore::new(dir.path().to_path_buf());

        let first = store
            .write(MediaFolder::Images, || Ok(unique_file_name("logo.png")), b"one")
            .await
            .expect("first");
        let second = store
            .write(MediaFolder::Images, || Ok(unique_file_name("logo.png")), b"two")
            .await
            .expect("second");

        assert_ne!(first.filename, second.filename);
        assert_eq!(std::fs::read(&first.path).expect("first"), b"one");
        assert_eq!(std::fs::read(&second.path).expect("second"), b"two");
        assert!(first.public_path.starts_with("/images/"));
    }

    #[actix_web::test]
    async fn collisions_draw_a_new_name_instead_of_overwriting() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = AssetStore::new(dir.path().to_path_buf());
        let existing = store.folder_path(MediaFolder::Documents).join("taken.pdf");
        std::fs::create_dir_all(existing.parent().expect("parent")).expect("mkdir");
        std::fs::write(&existing, b"original").expect("seed");

        let mut names = vec!["fresh.pdf".to_string(), "taken.pdf".to_string()];
        let stored = store
            .write(
                MediaFolder::Documents,
                || names.pop().ok_or(UploadError::Storage("exhausted".to_string())),
                b"new",
            )
            .await
            .expect("write");

        assert_eq!(stored.filename, "fresh.pdf");
        assert_eq!(std::fs::read(&existing).expect("existing"), b"original");
    }

    #[actix_web::test]
    async fn discard_removes_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = AssetStore::new(dir.path().to_path_buf());
        let stored = store
            .write(MediaFolder::SectionVideos, || Ok("clip.mp4".to_string()), b"v")
            .await
            .expect("write");
        store.discard(&stored).await;
        assert!(!stored.path.exists());
    }
}
