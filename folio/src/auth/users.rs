// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use chrono::{SecondsFormat, Utc};
use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;
use validator::ValidateEmail;

use super::AuthError;
use super::password::{hash_password, verify_password};
use crate::config::AdminAccountConfig;

static UNKNOWN_ACCOUNT_HASH: OnceLock<Option<String>> = OnceLock::new();

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: String,
    pub is_admin: bool,
    #[serde(skip)]
    password_hash: String,
}

/// Process-wide identities keyed by lower-cased email.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: RwLock<HashMap<String, User>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_admin(&self, account: &AdminAccountConfig) -> Result<User, AuthError> {
        let user = self.insert(&account.email, &account.password, &account.name, true)?;
        info!("Seeded administrator account {}", user.email);
        Ok(user)
    }

    pub fn register(&self, email: &str, password: &str, name: &str) -> Result<User, AuthError> {
        self.insert(email, password, name, false)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = required("email", email)?;
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        match self.find(email) {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user),
            Some(_) => Err(AuthError::InvalidCredentials),
            None => {
                // Unknown accounts pay the same Argon2 cost as a wrong password.
                if let Some(hash) = unknown_account_hash() {
                    verify_password(password, hash);
                }
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    pub fn find(&self, email: &str) -> Option<User> {
        self.read().get(&email_key(email)).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(
        &self,
        email: &str,
        password: &str,
        name: &str,
        is_admin: bool,
    ) -> Result<User, AuthError> {
        let email = required("email", email)?;
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        let name = required("name", name)?;
        if !email.validate_email() {
            return Err(AuthError::InvalidEmail(email.to_string()));
        }

        let key = email_key(email);
        if self.read().contains_key(&key) {
            return Err(AuthError::DuplicateEmail(email.to_string()));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            is_admin,
            password_hash: hash_password(password)?,
        };

        // Hashing ran without the lock; a concurrent registration may have won.
        match self.write().entry(key) {
            Entry::Occupied(_) => Err(AuthError::DuplicateEmail(email.to_string())),
            Entry::Vacant(slot) => Ok(slot.insert(user).clone()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, User>> {
        self.users
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, User>> {
        self.users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AuthError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn unknown_account_hash() -> Option<&'static str> {
    UNKNOWN_ACCOUNT_HASH
        .get_or_init(|| hash_password("unknown-account").ok())
        .as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_then_authenticate() {
        let directory = UserDirectory::new();
        let user = directory
            .register("editor@example.com", "pw", "Editor")
            .expect("register");
        assert!(!user.is_admin);
        assert!(Uuid::parse_str(&user.id).is_ok());

        let found = directory
            .authenticate("Editor@Example.com", "pw")
            .expect("authenticate");
        assert_eq!(found, user);
        assert_eq!(
            directory.authenticate("editor@example.com", "nope"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            directory.authenticate("ghost@example.com", "pw"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn unknown_email_is_checked_against_a_fixed_hash() {
        let directory = UserDirectory::new();
        assert_eq!(
            directory.authenticate("nobody@example.com", "unknown-account"),
            Err(AuthError::InvalidCredentials)
        );

        let hash = UNKNOWN_ACCOUNT_HASH
            .get()
            .and_then(Option::as_deref)
            .expect("hash computed on first miss");
        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(unknown_account_hash(), Some(hash));
    }

    #[test]
    fn duplicate_registration_keeps_the_original() {
        let directory = UserDirectory::new();
        let original = directory
            .register("dup@example.com", "first", "First")
            .expect("register");
        let result = directory.register("DUP@example.com", "second", "Second");
        assert!(matches!(result, Err(AuthError::DuplicateEmail(_))));

        assert_eq!(directory.find("dup@example.com"), Some(original));
        assert!(directory.authenticate("dup@example.com", "first").is_ok());
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn registration_requires_fields_and_a_valid_email() {
        let directory = UserDirectory::new();
        assert_eq!(
            directory.register(" ", "pw", "Name"),
            Err(AuthError::MissingField("email"))
        );
        assert_eq!(
            directory.register("a@example.com", "", "Name"),
            Err(AuthError::MissingField("password"))
        );
        assert_eq!(
            directory.register("a@example.com", "pw", ""),
            Err(AuthError::MissingField("name"))
        );
        assert!(matches!(
            directory.register("not-an-email", "pw", "Name"),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(directory.is_empty());
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let directory = UserDirectory::new();
        let user = directory
            .register("json@example.com", "pw", "Json")
            .expect("register");
        let value = serde_json::to_value(&user).expect("json");
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["createdAt"], serde_json::json!(user.created_at));
    }
}
