// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Keyed collections: free-form records whose `items` list holds entries addressed by `id`.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::ContentError;

pub const ITEMS_FIELD: &str = "items";
pub const ID_FIELD: &str = "id";
pub const LAST_UPDATED_FIELD: &str = "lastUpdated";

const MAX_COLLECTION_NAME_LEN: usize = 64;

pub fn validate_collection_name(name: &str) -> Result<(), ContentError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_COLLECTION_NAME_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(ContentError::InvalidCollectionName(name.to_string()))
    }
}

/// Prepares submitted collection content for storage.
pub fn prepare_content(content: Value) -> Result<Value, ContentError> {
    let Value::Object(mut record) = content else {
        return Err(ContentError::InvalidField {
            field: "content".to_string(),
            expected: "an object",
        });
    };

    match record.get_mut(ITEMS_FIELD) {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for item in items.iter_mut() {
                assign_missing_id(item);
            }
        }
        Some(_) => {
            return Err(ContentError::InvalidField {
                field: "content.items".to_string(),
                expected: "a list",
            });
        }
    }

    stamp(&mut record);
    Ok(Value::Object(record))
}

/// Shallow-merges `updates` into the item with `item_id`; the id itself is kept.
pub fn patch_item(
    section: &str,
    record: Option<Value>,
    item_id: &str,
    updates: &Map<String, Value>,
) -> Result<Value, ContentError> {
    let mut record = require_record(section, record)?;
    let item = items_mut(&mut record)
        .and_then(|items| items.iter_mut().find(|item| id_matches(item, item_id)))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| item_not_found(section, item_id))?;

    for (key, value) in updates {
        if key != ID_FIELD {
            item.insert(key.clone(), value.clone());
        }
    }
    stamp(&mut record);
    Ok(Value::Object(record))
}

pub fn remove_item(
    section: &str,
    record: Option<Value>,
    item_id: &str,
) -> Result<Value, ContentError> {
    let mut record = require_record(section, record)?;
    let items = items_mut(&mut record).ok_or_else(|| item_not_found(section, item_id))?;
    let position = items
        .iter()
        .position(|item| id_matches(item, item_id))
        .ok_or_else(|| item_not_found(section, item_id))?;
    items.remove(position);
    stamp(&mut record);
    Ok(Value::Object(record))
}

pub fn find_item<'a>(record: &'a Value, item_id: &str) -> Option<&'a Value> {
    record
        .get(ITEMS_FIELD)?
        .as_array()?
        .iter()
        .find(|item| id_matches(item, item_id))
}

/// Ids may be stored as strings or numbers; both compare by their text form.
pub fn id_matches(item: &Value, item_id: &str) -> bool {
    match item.get(ID_FIELD) {
        Some(Value::String(id)) => id == item_id,
        Some(Value::Number(id)) => id.to_string() == item_id,
        _ => false,
    }
}

fn assign_missing_id(item: &mut Value) {
    if let Value::Object(fields) = item {
        let has_id = match fields.get(ID_FIELD) {
            Some(Value::String(id)) => !id.trim().is_empty(),
            Some(Value::Number(_)) => true,
            _ => false,
        };
        if !has_id {
            fields.insert(
                ID_FIELD.to_string(),
                Value::String(Uuid::new_v4().to_string()),
            );
        }
    }
}

fn require_record(section: &str, record: Option<Value>) -> Result<Map<String, Value>, ContentError> {
    match record {
        Some(Value::Object(record)) => Ok(record),
        _ => Err(ContentError::SectionNotFound(section.to_string())),
    }
}

fn items_mut(record: &mut Map<String, Value>) -> Option<&mut Vec<Value>> {
    record.get_mut(ITEMS_FIELD)?.as_array_mut()
}

fn item_not_found(section: &str, item_id: &str) -> ContentError {
    ContentError::ItemNotFound {
        section: section.to_string(),
        item_id: item_id.to_string(),
    }
}

fn stamp(record: &mut Map<String, Value>) {
    record.insert(
        LAST_UPDATED_FIELD.to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
}
