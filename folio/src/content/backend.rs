// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use super::ContentError;
use super::json_store::{read_json_file, write_json_file};

/// Storage for named JSON records. Implementations are owned by the store worker.
pub trait SectionBackend: Send {
    fn load(&self, name: &str) -> Result<Option<Value>, ContentError>;
    fn save(&mut self, name: &str, value: &Value) -> Result<(), ContentError>;
}

/// Process-lifetime records, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: HashMap<String, Value>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SectionBackend for MemoryBackend {
    fn load(&self, name: &str) -> Result<Option<Value>, ContentError> {
        Ok(self.records.get(name).cloned())
    }

    fn save(&mut self, name: &str, value: &Value) -> Result<(), ContentError> {
        self.records.insert(name.to_string(), value.clone());
        Ok(())
    }
}

/// One pretty-printed `<name>.json` file per record under `dir`.
#[derive(Debug)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: PathBuf) -> Result<Self, ContentError> {
        if dir.as_os_str().is_empty() {
            return Err(ContentError::Storage(
                "Content directory path is empty".to_string(),
            ));
        }
        std::fs::create_dir_all(&dir).map_err(|err| {
            ContentError::Storage(format!(
                "Failed to create content directory '{}': {}",
                dir.display(),
                err
            ))
        })?;
        Ok(Self { dir })
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }
}

impl SectionBackend for JsonFileBackend {
    fn load(&self, name: &str) -> Result<Option<Value>, ContentError> {
        read_json_file(&self.record_path(name), name)
    }

    fn save(&mut self, name: &str, value: &Value) -> Result<(), ContentError> {
        write_json_file(&self.record_path(name), name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_backend_replaces_records() {
        let mut backend = MemoryBackend::new();
        assert_eq!(backend.load("about").expect("load"), None);
        backend.save("about", &json!({"mainTitle": "A"})).expect("save");
        backend.save("about", &json!({"mainTitle": "B"})).expect("save");
        assert_eq!(
            backend.load("about").expect("load"),
            Some(json!({"mainTitle": "B"}))
        );
    }

    #[test]
    fn file_backend_survives_a_new_instance() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut backend = JsonFileBackend::new(dir.path().join("data")).expect("backend");
        backend
            .save("settings", &json!({"siteName": "Folio"}))
            .expect("save");
        assert!(backend.record_path("settings").is_file());

        let reopened = JsonFileBackend::new(dir.path().join("data")).expect("reopen");
        assert_eq!(
            reopened.load("settings").expect("load"),
            Some(json!({"siteName": "Folio"}))
        );
    }

    #[test]
    fn file_backend_writes_pretty_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut backend = JsonFileBackend::new(dir.path().to_path_buf()).expect("backend");
        backend
            .save("expertise", &json!({"title": "T", "items": []}))
            .expect("save");
        let raw = std::fs::read_to_string(backend.record_path("expertise")).expect("read");
        assert!(raw.contains("\n  \"title\": \"T\""));
    }
}
