// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::ValidatedConfig;
use crate::content::{ContentError, ContentStore};
use crate::media::{AssetStore, SizeLimit};
use crate::runtime_paths::RuntimePaths;

pub struct AppState {
    pub content: ContentStore,
    pub assets: AssetStore,
    pub backend_url: Option<String>,
    pub file_limit: SizeLimit,
    pub video_limit: SizeLimit,
}

impl AppState {
    pub fn new(config: &ValidatedConfig, runtime_paths: &RuntimePaths) -> Result<Self, ContentError> {
        let content = ContentStore::open(
            runtime_paths.data_dir.clone(),
            runtime_paths.collections_dir.clone(),
        )?;
        Ok(Self {
            content,
            assets: AssetStore::new(runtime_paths.public_dir.clone()),
            backend_url: config.backend.base_url.clone(),
            file_limit: SizeLimit {
                max_mb: config.upload.max_file_size_mb,
                max_bytes: config.max_file_size_bytes(),
            },
            video_limit: SizeLimit {
                max_mb: config.upload.max_video_size_mb,
                max_bytes: config.max_video_size_bytes(),
            },
        })
    }
}
