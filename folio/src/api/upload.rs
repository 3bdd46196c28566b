// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::TryStreamExt;
use log::{info, warn};
use serde::Serialize;
use std::collections::HashMap;

use super::error::{ApiError, require_session};
use crate::app_state::AppState;
use crate::media::filename::validate_section;
use crate::media::{
    MediaCategory, MediaFolder, SizeLimit, UploadError, UploadedAsset, classify,
    section_file_name, unique_file_name,
};
use crate::util::effective_mime_type;

const GENERIC_FILE_FIELDS: &[&str] = &["file"];
const SECTION_VIDEO_FILE_FIELDS: &[&str] = &["video", "thumbnail"];
const MAX_TEXT_FIELD_BYTES: usize = 1024;
const DEFAULT_UPLOAD_NAME: &str = "upload";

struct FilePart {
    original_name: String,
    declared_type: Option<String>,
    bytes: Vec<u8>,
}

impl FilePart {
    fn mime_type(&self) -> String {
        effective_mime_type(
            self.declared_type.as_deref(),
            &self.original_name,
            &self.bytes,
        )
    }
}

/// Multipart form read fully into memory so every part can be validated before any write.
#[derive(Default)]
struct UploadForm {
    files: HashMap<String, FilePart>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// File parts outside `accepted` are rejected before their body is buffered.
    async fn read(
        mut payload: Multipart,
        limit: SizeLimit,
        accepted: &[&str],
    ) -> Result<Self, UploadError> {
        let limit_bytes = usize::try_from(limit.max_bytes).unwrap_or(usize::MAX);
        let mut form = UploadForm::default();

        while let Some(mut field) = payload
            .try_next()
            .await
            .map_err(|err| UploadError::Multipart(err.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let original_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);

            let is_file = accepted.contains(&name.as_str());
            if !is_file && original_name.is_some() {
                return Err(UploadError::UnexpectedFile(name));
            }
            let cap = if is_file {
                limit_bytes
            } else {
                MAX_TEXT_FIELD_BYTES
            };

            let declared_type = field.content_type().map(|mime| mime.essence_str().to_string());

            let mut bytes = Vec::new();
            while let Some(chunk) = field
                .try_next()
                .await
                .map_err(|err| UploadError::Multipart(err.to_string()))?
            {
                if bytes.len() + chunk.len() > cap {
                    return Err(if is_file {
                        UploadError::TooLarge {
                            limit_mb: limit.max_mb,
                        }
                    } else {
                        UploadError::Multipart(format!("field '{}' is too long", name))
                    });
                }
                bytes.extend_from_slice(&chunk);
            }

            if is_file {
                let original_name = original_name
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_UPLOAD_NAME.to_string());
                form.files.insert(
                    name,
                    FilePart {
                        original_name,
                        declared_type,
                        bytes,
                    },
                );
            } else {
                let text = String::from_utf8(bytes).map_err(|_| {
                    UploadError::Multipart(format!("field '{}' is not valid UTF-8", name))
                })?;
                form.fields.insert(name, text.trim().to_string());
            }
        }

        Ok(form)
    }

    fn take_file(&mut self, field: &'static str) -> Result<FilePart, UploadError> {
        let part = self
            .files
            .remove(field)
            .ok_or(UploadError::MissingFile(field))?;
        if part.bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }
        Ok(part)
    }

    /// Browsers send an empty part when an optional file input is left blank.
    fn take_optional_file(&mut self, field: &'static str) -> Option<FilePart> {
        self.files.remove(field).filter(|part| !part.bytes.is_empty())
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Serialize)]
struct UploadResponse {
    success: bool,
    #[serde(flatten)]
    asset: UploadedAsset,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoUploadResponse {
    success: bool,
    video_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail_path: Option<String>,
    filename: String,
    size: u64,
    mime_type: String,
    section: String,
}

fn check_type(category: MediaCategory, mime: &str) -> Result<(), UploadError> {
    if category.allows(mime) {
        Ok(())
    } else {
        Err(UploadError::UnsupportedType {
            category,
            mime: mime.to_string(),
        })
    }
}

pub async fn upload_file(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let session = require_session(&req)?;

    let mut form = UploadForm::read(payload, state.file_limit, GENERIC_FILE_FIELDS).await?;
    let file = form.take_file("file")?;
    let mime_type = file.mime_type();
    let category = classify(form.text("type"), &mime_type);
    if let Err(err) = check_type(category, &mime_type) {
        warn!("Rejected upload '{}': {}", file.original_name, err);
        return Err(err.into());
    }

    let original_name = file.original_name.clone();
    let stored = state
        .assets
        .write(
            category.folder(),
            || Ok(unique_file_name(&original_name)),
            &file.bytes,
        )
        .await?;
    info!(
        "{} uploaded {} as {}",
        session.user.email, original_name, stored.public_path
    );

    Ok(HttpResponse::Ok().json(UploadResponse {
        success: true,
        asset: UploadedAsset {
            original_name,
            filename: stored.filename,
            category,
            size: stored.size,
            mime_type,
            path: stored.public_path,
        },
    }))
}

pub async fn upload_section_video(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let session = require_session(&req)?;

    let mut form = UploadForm::read(payload, state.video_limit, SECTION_VIDEO_FILE_FIELDS).await?;
    let video = form.take_file("video")?;
    let section = validate_section(
        form.text("section")
            .ok_or(UploadError::MissingField("section"))?,
    )?
    .to_string();

    let video_mime = video.mime_type();
    check_type(MediaCategory::Video, &video_mime)?;

    let thumbnail = form.take_optional_file("thumbnail");
    if let Some(thumbnail) = &thumbnail {
        check_type(MediaCategory::Image, &thumbnail.mime_type())?;
    }

    let stored_video = state
        .assets
        .write(
            MediaFolder::SectionVideos,
            || section_file_name(&section, &video.original_name, false),
            &video.bytes,
        )
        .await?;

    let thumbnail_path = match &thumbnail {
        Some(thumbnail) => {
            let written = state
                .assets
                .write(
                    MediaFolder::SectionVideos,
                    || section_file_name(&section, &thumbnail.original_name, true),
                    &thumbnail.bytes,
                )
                .await;
            match written {
                Ok(stored) => Some(stored.public_path),
                Err(err) => {
                    state.assets.discard(&stored_video).await;
                    return Err(err.into());
                }
            }
        }
        None => None,
    };

    info!(
        "{} uploaded section video {} for '{}'",
        session.user.email, stored_video.public_path, section
    );

    Ok(HttpResponse::Ok().json(VideoUploadResponse {
        success: true,
        video_path: stored_video.public_path,
        thumbnail_path,
        filename: stored_video.filename,
        size: stored_video.size,
        mime_type: video_mime,
        section,
    }))
}
