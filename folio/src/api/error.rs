// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde::Serialize;
use std::fmt;

use crate::auth::{AuthError, AuthRequest, SessionUser};
use crate::content::ContentError;
use crate::media::UploadError;

const GENERIC_SERVER_ERROR: &str = "An internal error occurred";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Auth(String),
    Storage(String),
    Internal(String),
    Upstream(String),
    Unavailable(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
}

impl ApiError {
    fn public_message(&self) -> &str {
        match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Auth(msg)
            | ApiError::Upstream(msg)
            | ApiError::Unavailable(msg) => msg,
            ApiError::Storage(_) | ApiError::Internal(_) => GENERIC_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "validation failed: {}", msg),
            ApiError::NotFound(msg) => write!(f, "not found: {}", msg),
            ApiError::Auth(msg) => write!(f, "unauthorized: {}", msg),
            ApiError::Storage(msg) => write!(f, "storage fault: {}", msg),
            ApiError::Internal(msg) => write!(f, "internal error: {}", msg),
            ApiError::Upstream(msg) => write!(f, "upstream failure: {}", msg),
            ApiError::Unavailable(msg) => write!(f, "unavailable: {}", msg),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self, ApiError::Storage(_) | ApiError::Internal(_)) {
            log::error!("Request failed: {}", self);
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            error: self.public_message(),
        })
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::InvalidBody(_)
            | ContentError::MissingField(_)
            | ContentError::InvalidField { .. }
            | ContentError::InvalidCollectionName(_) => ApiError::Validation(err.to_string()),
            ContentError::UnknownSection(_)
            | ContentError::SectionNotFound(_)
            | ContentError::ItemNotFound { .. } => ApiError::NotFound(err.to_string()),
            ContentError::Storage(_) | ContentError::StoreUnavailable => {
                ApiError::Storage(err.to_string())
            }
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Storage(_) => ApiError::Storage(err.to_string()),
            _ => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingField(_)
            | AuthError::InvalidEmail(_)
            | AuthError::DuplicateEmail(_) => ApiError::Validation(err.to_string()),
            AuthError::InvalidCredentials
            | AuthError::InvalidToken(_)
            | AuthError::UnknownIdentity(_) => ApiError::Auth(err.to_string()),
            AuthError::TokenCreation(_) | AuthError::Hashing(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Mutating routes call this first.
pub fn require_session(req: &HttpRequest) -> Result<SessionUser, ApiError> {
    req.session_user()
        .ok_or_else(|| ApiError::Auth("Authentication required".to_string()))
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req| {
        log::debug!("Rejected JSON body on {}: {}", req.path(), err);
        ApiError::Validation("Invalid JSON body".to_string()).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, req| {
        log::debug!("Rejected query on {}: {}", req.path(), err);
        ApiError::Validation("Invalid query parameters".to_string()).into()
    })
}
