// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, web};
use log::{info, warn};
use serde_json::Value;

use super::error::{ApiError, require_session};
use crate::app_state::AppState;
use crate::content::{ContentError, SectionSchema, find_section};

fn schema_for(name: &str) -> Result<&'static SectionSchema, ApiError> {
    find_section(name).ok_or_else(|| ContentError::UnknownSection(name.to_string()).into())
}

pub async fn get_section(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let schema = schema_for(&path)?;
    let record = state.content.read_section(schema).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub async fn update_section(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let session = require_session(&req)?;
    let schema = schema_for(&path)?;

    match state.content.write_section(schema, body.into_inner()).await {
        Ok(record) => {
            info!("Section '{}' updated by {}", schema.name, session.user.email);
            Ok(HttpResponse::Ok().json(record))
        }
        Err(err) => {
            warn!("Rejected update of section '{}': {}", schema.name, err);
            Err(err.into())
        }
    }
}
