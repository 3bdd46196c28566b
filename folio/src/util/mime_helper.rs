// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::path::Path;

const OCTET_STREAM: &str = "application/octet-stream";

/// Detect MIME type using content-based detection (infer) with fallback to extension-based (mime_guess)
pub fn detect_mime_type(file_path: &Path, file_content: &[u8]) -> String {
    if let Some(mime_type) = infer::get(file_content) {
        return mime_type.mime_type().to_string();
    }

    if let Some(mime_type) = mime_guess::from_path(file_path).first() {
        return mime_type.to_string();
    }

    OCTET_STREAM.to_string()
}

/// Trust the declared part type unless it is missing or generic.
pub fn effective_mime_type(declared: Option<&str>, file_name: &str, file_content: &[u8]) -> String {
    match declared.map(|value| value.trim().to_ascii_lowercase()) {
        Some(value) if !value.is_empty() && value != OCTET_STREAM => value,
        _ => detect_mime_type(Path::new(file_name), file_content),
    }
}
