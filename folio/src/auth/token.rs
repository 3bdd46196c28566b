// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::cookie::{Cookie, SameSite, time};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;
use super::users::User;
use crate::config::ValidatedConfig;

const ADMIN_FLAG_VALUE: &str = "true";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,  // user email
    pub name: String, // display name
    pub admin: bool,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub jti: String,
}

/// Mints and verifies HS256 session tokens and builds the session cookies.
pub struct TokenService {
    secret: String,
    issuer: String,
    session_hours: i64,
    cookie_name: String,
    admin_cookie_name: String,
    secure_cookies: bool,
}

impl TokenService {
    pub fn new(config: &ValidatedConfig) -> Self {
        let host = config.server.host.as_str();
        let is_localhost = matches!(host, "127.0.0.1" | "localhost" | "::1" | "0.0.0.0");
        Self {
            secret: config.auth.secret.clone(),
            issuer: config.auth.issuer.clone(),
            session_hours: config.session_hours(),
            cookie_name: config.auth.cookie_name.clone(),
            admin_cookie_name: config.auth.admin_cookie_name.clone(),
            secure_cookies: !is_localhost,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn admin_cookie_name(&self) -> &str {
        &self.admin_cookie_name
    }

    pub fn create_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.session_hours);

        let claims = Claims {
            sub: user.email.clone(),
            name: user.name.clone(),
            admin: user.is_admin,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Checks signature, issuer and expiry.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// HTTP-only session cookie carrying the token.
    pub fn session_cookie<'a>(&self, token: &str) -> Cookie<'a> {
        Cookie::build(self.cookie_name.clone(), token.to_string())
            .path("/")
            .secure(self.secure_cookies)
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(self.max_age())
            .finish()
    }

    /// Script-readable flag the admin UI uses to show admin navigation.
    pub fn admin_flag_cookie<'a>(&self) -> Cookie<'a> {
        Cookie::build(self.admin_cookie_name.clone(), ADMIN_FLAG_VALUE)
            .path("/")
            .secure(self.secure_cookies)
            .http_only(false)
            .same_site(SameSite::Lax)
            .max_age(self.max_age())
            .finish()
    }

    pub fn logout_cookies<'a>(&self) -> [Cookie<'a>; 2] {
        [
            self.expired_cookie(self.cookie_name.clone(), true),
            self.expired_cookie(self.admin_cookie_name.clone(), false),
        ]
    }

    fn expired_cookie<'a>(&self, name: String, http_only: bool) -> Cookie<'a> {
        Cookie::build(name, "")
            .path("/")
            .secure(self.secure_cookies)
            .http_only(http_only)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(0))
            .expires(time::OffsetDateTime::UNIX_EPOCH)
            .finish()
    }

    fn max_age(&self) -> time::Duration {
        time::Duration::hours(self.session_hours)
    }
}
