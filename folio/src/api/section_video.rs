// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse, web};
use log::{info, warn};

use super::error::{ApiError, require_session};
use crate::app_state::AppState;
use crate::media::filename::validate_section;

const MAX_UPSTREAM_BODY_BYTES: usize = 1024 * 1024;

/// Forwards a section-video toggle to the external backend and relays its answer.
pub async fn toggle(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
    body: Bytes,
) -> Result<HttpResponse, ApiError> {
    let session = require_session(&req)?;
    let section = validate_section(&path)?.to_string();
    let base_url = state.backend_url.as_deref().ok_or_else(|| {
        ApiError::Unavailable("Section video backend is not configured".to_string())
    })?;
    let url = format!("{}/api/section-videos/{}/toggle", base_url, section);

    let client = awc::Client::default();
    let mut upstream = client
        .post(&url)
        .insert_header((CONTENT_TYPE, "application/json"));
    if let Some(authorization) = req.headers().get(AUTHORIZATION) {
        upstream = upstream.insert_header((AUTHORIZATION, authorization.clone()));
    }

    let mut response = upstream.send_body(body).await.map_err(|err| {
        warn!("Section video backend request to {} failed: {}", url, err);
        ApiError::Upstream("Section video backend is unreachable".to_string())
    })?;
    let payload = response
        .body()
        .limit(MAX_UPSTREAM_BODY_BYTES)
        .await
        .map_err(|err| {
            warn!("Section video backend response from {} unreadable: {}", url, err);
            ApiError::Upstream("Section video backend returned an unreadable response".to_string())
        })?;

    info!(
        "{} toggled section video '{}' (backend status {})",
        session.user.email,
        section,
        response.status()
    );

    let mut relayed = HttpResponse::build(response.status());
    if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
        relayed.insert_header((CONTENT_TYPE, content_type.clone()));
    }
    Ok(relayed.body(payload))
}
