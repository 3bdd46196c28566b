// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, web};
use log::{info, warn};
use serde::Deserialize;
use serde_json::{Value, json};

use super::error::{ApiError, require_session};
use crate::app_state::AppState;
use crate::content::ContentError;

#[derive(Debug, Deserialize)]
pub struct SectionQuery {
    section: Option<String>,
    #[serde(rename = "itemId")]
    item_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StoreContentRequest {
    section: Option<String>,
    content: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    section: Option<String>,
    #[serde(rename = "itemId")]
    item_id: Option<Value>,
    updates: Option<Value>,
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ApiError::Validation(format!("Missing required field: {}", field)))
}

/// Item ids arrive as strings or numbers.
fn item_id_text(value: Option<Value>) -> Result<String, ApiError> {
    match value {
        Some(Value::String(id)) if !id.trim().is_empty() => Ok(id.trim().to_string()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(ApiError::Validation(
            "Missing required field: itemId".to_string(),
        )),
    }
}

pub async fn get_content(
    query: web::Query<SectionQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let section = required_text(query.into_inner().section, "section")?;
    let content = state
        .content
        .get_collection(&section)
        .await?
        .ok_or(ContentError::SectionNotFound(section))?;
    Ok(HttpResponse::Ok().json(content))
}

pub async fn store_content(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<StoreContentRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = require_session(&req)?;
    let body = body.into_inner();
    let section = required_text(body.section, "section")?;
    let content = body
        .content
        .filter(|value| !value.is_null())
        .ok_or_else(|| ApiError::Validation("Missing required field: content".to_string()))?;

    let stored = state
        .content
        .put_collection(&section, content)
        .await
        .inspect_err(|err| warn!("Rejected content for '{}': {}", section, err))?;
    info!("Collection '{}' replaced by {}", section, session.user.email);
    Ok(HttpResponse::Ok().json(stored))
}

pub async fn update_item(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<UpdateItemRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = require_session(&req)?;
    let body = body.into_inner();
    let section = required_text(body.section, "section")?;
    let item_id = item_id_text(body.item_id)?;
    let updates = match body.updates {
        Some(Value::Object(updates)) => updates,
        Some(_) => {
            return Err(ApiError::Validation(
                "Field 'updates' must be an object".to_string(),
            ));
        }
        None => {
            return Err(ApiError::Validation(
                "Missing required field: updates".to_string(),
            ));
        }
    };

    let item = state
        .content
        .patch_item(&section, &item_id, updates)
        .await
        .inspect_err(|err| warn!("Rejected item update in '{}': {}", section, err))?;
    info!(
        "Item '{}' in '{}' updated by {}",
        item_id, section, session.user.email
    );
    Ok(HttpResponse::Ok().json(json!({ "success": true, "item": item })))
}

pub async fn delete_item(
    req: HttpRequest,
    query: web::Query<SectionQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let session = require_session(&req)?;
    let query = query.into_inner();
    let section = required_text(query.section, "section")?;
    let item_id = required_text(query.item_id, "itemId")?;

    state
        .content
        .remove_item(&section, &item_id)
        .await
        .inspect_err(|err| warn!("Rejected item removal in '{}': {}", section, err))?;
    info!(
        "Item '{}' removed from '{}' by {}",
        item_id, section, session.user.email
    );
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
