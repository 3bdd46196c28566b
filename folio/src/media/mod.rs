// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod category;
pub mod filename;
pub mod store;

use serde::Serialize;
use std::fmt;

pub use category::{MediaCategory, MediaFolder, classify};
pub use filename::{sanitize_file_name, section_file_name, unique_file_name};
pub use store::{AssetStore, StoredFile};

/// Per-route upload cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimit {
    pub max_bytes: u64,
    pub max_mb: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    Multipart(String),
    MissingFile(&'static str),
    MissingField(&'static str),
    UnexpectedFile(String),
    EmptyFile,
    TooLarge { limit_mb: u64 },
    UnsupportedType { category: MediaCategory, mime: String },
    InvalidSection(String),
    Storage(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Multipart(msg) => write!(f, "Invalid multipart upload: {}", msg),
            UploadError::MissingFile(field) => write!(f, "No file provided in '{}'", field),
            UploadError::MissingField(field) => write!(f, "Missing required field: {}", field),
            UploadError::UnexpectedFile(field) => {
                write!(f, "Unexpected file field '{}'", field)
            }
            UploadError::EmptyFile => write!(f, "Uploaded file is empty"),
            UploadError::TooLarge { limit_mb } => {
                write!(f, "File too large. Maximum size is {}MB", limit_mb)
            }
            UploadError::UnsupportedType { category, mime } => write!(
                f,
                "Invalid {} type '{}'. Allowed formats: {}",
                category.as_str(),
                mime,
                category.allowed_formats()
            ),
            UploadError::InvalidSection(section) => write!(
                f,
                "Invalid section '{}': use 1-64 characters from a-z, 0-9, '-' and '_'",
                section
            ),
            UploadError::Storage(msg) => write!(f, "Failed to store upload: {}", msg),
        }
    }
}

impl std::error::Error for UploadError {}

/// A file accepted by the upload handler.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    pub original_name: String,
    pub filename: String,
    pub category: MediaCategory,
    pub size: u64,
    pub mime_type: String,
    pub path: String,
}
