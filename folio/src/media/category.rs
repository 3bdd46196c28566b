// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::Serialize;

const IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/svg+xml",
    "image/x-icon",
    "image/vnd.microsoft.icon",
    "image/gif",
    "image/webp",
];

const VIDEO_TYPES: &[&str] = &[
    "video/mp4",
    "video/webm",
    "video/ogg",
    "video/quicktime",
    "video/x-msvideo",
    "video/avi",
    "video/x-matroska",
];

const AUDIO_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/wave",
    "audio/ogg",
    "audio/webm",
    "audio/mp4",
    "audio/m4a",
    "audio/x-m4a",
];

const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/zip",
    "application/x-zip-compressed",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Image,
    Video,
    Audio,
    Document,
}

impl MediaCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaCategory::Image => "image",
            MediaCategory::Video => "video",
            MediaCategory::Audio => "audio",
            MediaCategory::Document => "document",
        }
    }

    pub fn allowed_types(self) -> &'static [&'static str] {
        match self {
            MediaCategory::Image => IMAGE_TYPES,
            MediaCategory::Video => VIDEO_TYPES,
            MediaCategory::Audio => AUDIO_TYPES,
            MediaCategory::Document => DOCUMENT_TYPES,
        }
    }

    pub fn allows(self, mime: &str) -> bool {
        self.allowed_types().contains(&mime)
    }

    /// Human-readable list used in rejection messages.
    pub fn allowed_formats(self) -> &'static str {
        match self {
            MediaCategory::Image => "PNG, JPEG, SVG, ICO, GIF, WebP",
            MediaCategory::Video => "MP4, WebM, OGG, MOV, AVI, MKV",
            MediaCategory::Audio => "MP3, WAV, OGG, WebM, M4A",
            MediaCategory::Document => "PDF, Word, Excel, PowerPoint, ZIP",
        }
    }

    pub fn folder(self) -> MediaFolder {
        match self {
            MediaCategory::Image => MediaFolder::Images,
            MediaCategory::Video => MediaFolder::Videos,
            MediaCategory::Audio => MediaFolder::Podcasts,
            MediaCategory::Document => MediaFolder::Documents,
        }
    }
}

/// Destination directories under the public tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFolder {
    Images,
    Videos,
    Podcasts,
    Documents,
    SectionVideos,
}

impl MediaFolder {
    pub const ALL: [MediaFolder; 5] = [
        MediaFolder::Images,
        MediaFolder::Videos,
        MediaFolder::Podcasts,
        MediaFolder::Documents,
        MediaFolder::SectionVideos,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            MediaFolder::Images => "images",
            MediaFolder::Videos => "videos",
            MediaFolder::Podcasts => "podcasts",
            MediaFolder::Documents => "documents",
            MediaFolder::SectionVideos => "videos-sections",
        }
    }
}

/// Picks the category for an upload. An `image/*` type always wins over the hint;
/// otherwise the hint decides and anything unrecognised is treated as an image.
pub fn classify(hint: Option<&str>, mime: &str) -> MediaCategory {
    if mime.starts_with("image/") {
        return MediaCategory::Image;
    }
    match hint.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        Some("video") => MediaCategory::Video,
        Some("audio") => MediaCategory::Audio,
        Some("document") => MediaCategory::Document,
        _ => MediaCategory::Image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_mime_overrides_hint() {
        assert_eq!(classify(Some("video"), "image/png"), MediaCategory::Image);
        assert_eq!(classify(Some("document"), "image/webp"), MediaCategory::Image);
    }

    #[test]
    fn hint_selects_non_image_categories() {
        assert_eq!(classify(Some("video"), "video/mp4"), MediaCategory::Video);
        assert_eq!(classify(Some("Audio"), "audio/mpeg"), MediaCategory::Audio);
        assert_eq!(
            classify(Some("document"), "application/pdf"),
            MediaCategory::Document
        );
    }

    #[test]
    fn logo_favicon_and_unknown_hints_mean_image() {
        for hint in [Some("logo"), Some("favicon"), Some(""), Some("banner"), None] {
            assert_eq!(classify(hint, "video/mp4"), MediaCategory::Image);
        }
    }

    #[test]
    fn allow_lists_are_category_specific() {
        assert!(MediaCategory::Image.allows("image/svg+xml"));
        assert!(!MediaCategory::Image.allows("image/tiff"));
        assert!(MediaCategory::Video.allows("video/x-matroska"));
        assert!(!MediaCategory::Video.allows("audio/mpeg"));
        assert!(MediaCategory::Audio.allows("audio/x-m4a"));
        assert!(MediaCategory::Document.allows("application/x-zip-compressed"));
        assert!(!MediaCategory::Document.allows("application/x-msdownload"));
    }

    #[test]
    fn folders() {
        assert_eq!(MediaCategory::Audio.folder().dir_name(), "podcasts");
        assert_eq!(MediaCategory::Document.folder().dir_name(), "documents");
        assert_eq!(MediaFolder::SectionVideos.dir_name(), "videos-sections");
    }
}
