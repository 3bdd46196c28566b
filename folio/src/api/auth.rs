// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, web};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::auth::{AuthError, AuthRequest, AuthService, User};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
    token: String,
    user: User,
}

#[derive(Serialize)]
struct UserResponse {
    success: bool,
    user: User,
}

#[derive(Serialize)]
struct CheckResponse {
    authenticated: bool,
    user: User,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, AuthError> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or(AuthError::MissingField(field))
}

pub async fn login(
    auth: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let email = required(body.email, "email")?;
    let password = required(body.password, "password")?;

    let service = auth.clone();
    let attempt_email = email.clone();
    let outcome = web::block(move || service.login(&attempt_email, &password)).await?;
    let (token, user) = match outcome {
        Ok(result) => result,
        Err(err) => {
            warn!("Failed login for {}: {}", email, err);
            return Err(err.into());
        }
    };

    info!("User {} logged in", user.email);
    let mut response = HttpResponse::Ok();
    response.cookie(auth.tokens().session_cookie(&token));
    if user.is_admin {
        response.cookie(auth.tokens().admin_flag_cookie());
    }
    Ok(response.json(LoginResponse {
        success: true,
        token,
        user,
    }))
}

pub async fn register(
    auth: web::Data<AuthService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let email = required(body.email, "email")?;
    let password = required(body.password, "password")?;
    let name = required(body.name, "name")?;

    let service = auth.clone();
    let user = web::block(move || service.directory().register(&email, &password, &name))
        .await?
        .inspect_err(|err| warn!("Registration rejected: {}", err))?;

    info!("Registered user {}", user.email);
    Ok(HttpResponse::Ok().json(UserResponse {
        success: true,
        user,
    }))
}

/// Verifies the bearer token (or the session cookie resolved by the middleware).
pub async fn check(
    req: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    let session = match req.bearer_token() {
        Some(token) => auth.resolve(&token)?,
        None => req
            .session_user()
            .ok_or_else(|| ApiError::Auth("No session token provided".to_string()))?,
    };

    Ok(HttpResponse::Ok().json(CheckResponse {
        authenticated: true,
        user: session.user,
    }))
}

pub async fn logout(req: HttpRequest, auth: web::Data<AuthService>) -> HttpResponse {
    if let Some(session) = req.session_user() {
        info!("User {} logged out", session.user.email);
    }
    let mut response = HttpResponse::Ok();
    for cookie in auth.tokens().logout_cookies() {
        response.cookie(cookie);
    }
    response.json(serde_json::json!({ "success": true }))
}
