// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod gate;
pub mod middleware;
pub mod password;
pub mod token;
pub mod users;

use std::fmt;

use crate::config::ValidatedConfig;

pub use gate::AdminGate;
pub use middleware::{AuthRequest, SessionMiddlewareFactory, SessionUser};
pub use token::{Claims, TokenService};
pub use users::{User, UserDirectory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    MissingField(&'static str),
    InvalidEmail(String),
    DuplicateEmail(String),
    InvalidCredentials,
    InvalidToken(String),
    UnknownIdentity(String),
    TokenCreation(String),
    Hashing(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingField(field) => write!(f, "Missing required field: {}", field),
            AuthError::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
            AuthError::DuplicateEmail(email) => {
                write!(f, "A user with email {} already exists", email)
            }
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::InvalidToken(msg) => write!(f, "Invalid session token: {}", msg),
            AuthError::UnknownIdentity(email) => write!(f, "Unknown user: {}", email),
            AuthError::TokenCreation(msg) => write!(f, "Failed to create session token: {}", msg),
            AuthError::Hashing(msg) => write!(f, "Password hashing failed: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// User directory plus token service, shared by the auth routes and the session middleware.
pub struct AuthService {
    directory: UserDirectory,
    tokens: TokenService,
}

impl AuthService {
    pub fn from_config(config: &ValidatedConfig) -> Result<Self, AuthError> {
        let directory = UserDirectory::new();
        directory.seed_admin(&config.auth.admin)?;
        Ok(Self {
            directory,
            tokens: TokenService::new(config),
        })
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Checks credentials and mints a session token.
    pub fn login(&self, email: &str, password: &str) -> Result<(String, User), AuthError> {
        let user = self.directory.authenticate(email, password)?;
        let token = self.tokens.create_token(&user)?;
        Ok((token, user))
    }

    /// Verifies the token and confirms the identity still exists.
    pub fn resolve(&self, token: &str) -> Result<SessionUser, AuthError> {
        let claims = self.tokens.verify_token(token)?;
        let user = self
            .directory
            .find(&claims.sub)
            .ok_or_else(|| AuthError::UnknownIdentity(claims.sub.clone()))?;
        Ok(SessionUser { user, claims })
    }
}
