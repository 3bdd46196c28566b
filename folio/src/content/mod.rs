// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod backend;
pub mod collections;
pub mod json_store;
pub mod schema;
pub mod sections;
pub mod store;

use std::fmt;

pub use backend::{JsonFileBackend, MemoryBackend, SectionBackend};
pub use schema::{FieldDefault, FieldKind, FieldSpec, SectionSchema};
pub use sections::{Backing, find_section};
pub use store::{ContentStore, Location};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    InvalidBody(String),
    MissingField(String),
    InvalidField {
        field: String,
        expected: &'static str,
    },
    UnknownSection(String),
    InvalidCollectionName(String),
    SectionNotFound(String),
    ItemNotFound {
        section: String,
        item_id: String,
    },
    Storage(String),
    StoreUnavailable,
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::InvalidBody(msg) => write!(f, "{}", msg),
            ContentError::MissingField(field) => write!(f, "Missing required field: {}", field),
            ContentError::InvalidField { field, expected } => {
                write!(f, "Field '{}' must be {}", field, expected)
            }
            ContentError::UnknownSection(name) => write!(f, "Unknown section: {}", name),
            ContentError::InvalidCollectionName(name) => write!(
                f,
                "Invalid section name '{}': use 1-64 characters from a-z, 0-9, '-' and '_'",
                name
            ),
            ContentError::SectionNotFound(name) => write!(f, "Section not found: {}", name),
            ContentError::ItemNotFound { section, item_id } => {
                write!(f, "Item '{}' not found in section '{}'", item_id, section)
            }
            ContentError::Storage(msg) => write!(f, "Content storage failed: {}", msg),
            ContentError::StoreUnavailable => write!(f, "Content store is not running"),
        }
    }
}

impl std::error::Error for ContentError {}
