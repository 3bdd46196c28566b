// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::Utc;

use super::UploadError;

const MAX_STEM_CHARS: usize = 64;
const MAX_EXTENSION_CHARS: usize = 10;
const MAX_SECTION_CHARS: usize = 64;
const FALLBACK_STEM: &str = "file";

/// Reduces a client-supplied name to `[a-z0-9._-]`.
pub fn sanitize_file_name(raw_name: &str) -> String {
    let base_name = raw_name.rsplit(['/', '\\']).next().unwrap_or(raw_name);
    let mut sanitized = String::with_capacity(base_name.len());
    for ch in base_name.chars().flat_map(char::to_lowercase) {
        let mapped = if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            ch
        } else {
            '-'
        };
        if mapped == '-' && sanitized.ends_with('-') {
            continue;
        }
        sanitized.push(mapped);
    }
    while sanitized.contains("..") {
        sanitized = sanitized.replace("..", ".");
    }
    sanitized
        .trim_start_matches(['.', '-'])
        .trim_end_matches(['.', '-'])
        .to_string()
}

/// `<stem>-<unix millis>-<random hex>.<ext>` derived from the original name.
pub fn unique_file_name(original_name: &str) -> String {
    let sanitized = sanitize_file_name(original_name);
    let (stem, extension) = split_extension(&sanitized);
    let stem = truncate(stem.trim_end_matches(['-', '_']), MAX_STEM_CHARS);
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
    with_extension(format!("{}-{}", stem, unique_suffix()), extension)
}

/// `<section>-<unix millis>-<random hex>.<ext>`, or `<section>-thumb-...` for thumbnails.
pub fn section_file_name(
    section: &str,
    original_name: &str,
    thumbnail: bool,
) -> Result<String, UploadError> {
    let section = validate_section(section)?;
    let sanitized = sanitize_file_name(original_name);
    let (_, extension) = split_extension(&sanitized);
    let prefix = if thumbnail {
        format!("{}-thumb", section)
    } else {
        section.to_string()
    };
    Ok(with_extension(
        format!("{}-{}", prefix, unique_suffix()),
        extension,
    ))
}

pub fn validate_section(section: &str) -> Result<&str, UploadError> {
    let section = section.trim();
    let valid = !section.is_empty()
        && section.len() <= MAX_SECTION_CHARS
        && section
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
    if valid {
        Ok(section)
    } else {
        Err(UploadError::InvalidSection(section.to_string()))
    }
}

fn split_extension(name: &str) -> (&str, Option<String>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext: String = ext
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .take(MAX_EXTENSION_CHARS)
                .collect();
            (stem, (!ext.is_empty()).then_some(ext))
        }
        _ => (name, None),
    }
}

fn with_extension(base: String, extension: Option<String>) -> String {
    match extension {
        Some(ext) => format!("{}.{}", base, ext),
        None => base,
    }
}

fn truncate(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((index, _)) => &value[..index],
        None => value,
    }
}

fn unique_suffix() -> String {
    let mut bytes = [0u8; 4];
    OsRng.fill_bytes(&mut bytes);
    format!("{}-{}", Utc::now().timestamp_millis(), hex::encode(bytes))
}
