// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde_json::{Map, Value};

use super::ContentError;
use super::sections::Backing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    List,
    Map,
}

impl FieldKind {
    pub fn describe(self) -> &'static str {
        match self {
            FieldKind::Text => "a string",
            FieldKind::List => "a list",
            FieldKind::Map => "an object",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (FieldKind::Text, Value::String(_))
                | (FieldKind::List, Value::Array(_))
                | (FieldKind::Map, Value::Object(_))
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Text(&'static str),
    EmptyList,
    EmptyMap,
}

impl FieldDefault {
    fn to_value(self) -> Value {
        match self {
            FieldDefault::Text(text) => Value::String(text.to_string()),
            FieldDefault::EmptyList => Value::Array(Vec::new()),
            FieldDefault::EmptyMap => Value::Object(Map::new()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: FieldDefault,
}

impl FieldSpec {
    pub const fn required(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: true,
            default: FieldDefault::Text(default),
        }
    }

    pub const fn text(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: false,
            default: FieldDefault::Text(default),
        }
    }

    pub const fn list(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::List,
            required: false,
            default: FieldDefault::EmptyList,
        }
    }

    pub const fn map(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Map,
            required: false,
            default: FieldDefault::EmptyMap,
        }
    }
}

#[derive(Debug)]
pub struct SectionSchema {
    pub name: &'static str,
    pub backing: Backing,
    pub fields: &'static [FieldSpec],
}

impl SectionSchema {
    /// The record served before anything was written.
    pub fn default_record(&self) -> Value {
        let record: Map<String, Value> = self
            .fields
            .iter()
            .map(|field| (field.name.to_string(), field.default.to_value()))
            .collect();
        Value::Object(record)
    }

    /// Checks `incoming` and merges it over `previous` (or the defaults).
    ///
    /// A required field counts as missing when absent, null or a blank string.
    /// Optional fields that are absent or null keep their previous value.
    /// Fields the schema does not declare are dropped.
    pub fn validate_and_merge(
        &self,
        previous: Option<&Value>,
        incoming: &Value,
    ) -> Result<Value, ContentError> {
        let incoming = incoming.as_object().ok_or_else(|| {
            ContentError::InvalidBody("Request body must be a JSON object".to_string())
        })?;

        let mut merged = Map::new();
        for field in self.fields {
            let supplied = incoming.get(field.name).filter(|value| !value.is_null());

            if field.required && supplied.is_none_or(is_blank_text) {
                return Err(ContentError::MissingField(field.name.to_string()));
            }

            let value = match supplied {
                Some(value) if field.kind.accepts(value) => value.clone(),
                Some(_) => {
                    return Err(ContentError::InvalidField {
                        field: field.name.to_string(),
                        expected: field.kind.describe(),
                    });
                }
                None => previous
                    .and_then(|record| record.get(field.name))
                    .filter(|value| field.kind.accepts(value))
                    .cloned()
                    .unwrap_or_else(|| field.default.to_value()),
            };
            merged.insert(field.name.to_string(), value);
        }
        Ok(Value::Object(merged))
    }

    /// Fills fields missing from a stored record with defaults; used when reading.
    pub fn normalize(&self, stored: &Value) -> Value {
        let mut record = Map::new();
        for field in self.fields {
            let value = stored
                .get(field.name)
                .filter(|value| field.kind.accepts(value))
                .cloned()
                .unwrap_or_else(|| field.default.to_value());
            record.insert(field.name.to_string(), value);
        }
        Value::Object(record)
    }
}

fn is_blank_text(value: &Value) -> bool {
    value.as_str().is_some_and(|text| text.trim().is_empty())
}
