// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::{debug, error};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};

use super::backend::{JsonFileBackend, MemoryBackend, SectionBackend};
use super::collections;
use super::schema::SectionSchema;
use super::sections::Backing;
use super::ContentError;

const STORE_CHANNEL_DEPTH: usize = 64;

type UpdateFn = Box<dyn FnOnce(Option<Value>) -> Result<Value, ContentError> + Send>;
type Reply<T> = oneshot::Sender<Result<T, ContentError>>;

/// Where a record lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Memory(String),
    File(String),
    Collection(String),
}

impl Location {
    pub fn for_section(schema: &SectionSchema) -> Self {
        match schema.backing {
            Backing::Memory => Location::Memory(schema.name.to_string()),
            Backing::File => Location::File(schema.name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Location::Memory(name) | Location::File(name) | Location::Collection(name) => name,
        }
    }
}

enum StoreCommand {
    Get {
        location: Location,
        reply: Reply<Option<Value>>,
    },
    GetOrInit {
        location: Location,
        default: Value,
        reply: Reply<Value>,
    },
    Put {
        location: Location,
        value: Value,
        reply: Reply<Value>,
    },
    Update {
        location: Location,
        apply: UpdateFn,
        reply: Reply<Value>,
    },
}

/// Handle to the content worker. Every read and write is processed one at a time
/// by a single thread that owns all backends, so read-merge-write cycles never interleave.
#[derive(Clone)]
pub struct ContentStore {
    sender: mpsc::Sender<StoreCommand>,
}

impl ContentStore {
    pub fn open(data_dir: PathBuf, collections_dir: PathBuf) -> Result<Self, ContentError> {
        let backends = Backends {
            memory: MemoryBackend::new(),
            files: JsonFileBackend::new(data_dir)?,
            collections: JsonFileBackend::new(collections_dir)?,
        };
        Self::spawn(backends)
    }

    fn spawn(mut backends: Backends) -> Result<Self, ContentError> {
        let (sender, mut receiver) = mpsc::channel(STORE_CHANNEL_DEPTH);
        std::thread::Builder::new()
            .name("folio-content-store".to_string())
            .spawn(move || {
                while let Some(command) = receiver.blocking_recv() {
                    backends.handle(command);
                }
                debug!("Content store worker stopped");
            })
            .map_err(|err| {
                ContentError::Storage(format!("Failed to start content store worker: {}", err))
            })?;
        Ok(Self { sender })
    }

    pub async fn get(&self, location: Location) -> Result<Option<Value>, ContentError> {
        let (reply, receive) = oneshot::channel();
        self.send(StoreCommand::Get { location, reply }).await?;
        receive.await.unwrap_or(Err(ContentError::StoreUnavailable))
    }

    /// Returns the stored record, persisting `default` first when nothing is stored yet.
    pub async fn get_or_init(&self, location: Location, default: Value) -> Result<Value, ContentError> {
        let (reply, receive) = oneshot::channel();
        self.send(StoreCommand::GetOrInit {
            location,
            default,
            reply,
        })
        .await?;
        receive.await.unwrap_or(Err(ContentError::StoreUnavailable))
    }

    pub async fn put(&self, location: Location, value: Value) -> Result<Value, ContentError> {
        let (reply, receive) = oneshot::channel();
        self.send(StoreCommand::Put {
            location,
            value,
            reply,
        })
        .await?;
        receive.await.unwrap_or(Err(ContentError::StoreUnavailable))
    }

    /// Runs `apply` on the current record and stores its result. Nothing is written when it fails.
    pub async fn update<F>(&self, location: Location, apply: F) -> Result<Value, ContentError>
    where
        F: FnOnce(Option<Value>) -> Result<Value, ContentError> + Send + 'static,
    {
        let (reply, receive) = oneshot::channel();
        self.send(StoreCommand::Update {
            location,
            apply: Box::new(apply),
            reply,
        })
        .await?;
        receive.await.unwrap_or(Err(ContentError::StoreUnavailable))
    }

    pub async fn read_section(&self, schema: &'static SectionSchema) -> Result<Value, ContentError> {
        let location = Location::for_section(schema);
        let stored = match schema.backing {
            Backing::File => self.get_or_init(location, schema.default_record()).await?,
            Backing::Memory => self
                .get(location)
                .await?
                .unwrap_or_else(|| schema.default_record()),
        };
        Ok(schema.normalize(&stored))
    }

    pub async fn write_section(
        &self,
        schema: &'static SectionSchema,
        body: Value,
    ) -> Result<Value, ContentError> {
        self.update(Location::for_section(schema), move |previous| {
            schema.validate_and_merge(previous.as_ref(), &body)
        })
        .await
    }

    pub async fn get_collection(&self, name: &str) -> Result<Option<Value>, ContentError> {
        collections::validate_collection_name(name)?;
        self.get(Location::Collection(name.to_string())).await
    }

    pub async fn put_collection(&self, name: &str, content: Value) -> Result<Value, ContentError> {
        collections::validate_collection_name(name)?;
        let prepared = collections::prepare_content(content)?;
        self.put(Location::Collection(name.to_string()), prepared).await
    }

    /// Shallow-merges `updates` into one collection item and returns the updated item.
    pub async fn patch_item(
        &self,
        name: &str,
        item_id: &str,
        updates: Map<String, Value>,
    ) -> Result<Value, ContentError> {
        collections::validate_collection_name(name)?;
        let section = name.to_string();
        let id = item_id.to_string();
        let stored = self
            .update(Location::Collection(name.to_string()), move |record| {
                collections::patch_item(&section, record, &id, &updates)
            })
            .await?;
        collections::find_item(&stored, item_id)
            .cloned()
            .ok_or_else(|| ContentError::ItemNotFound {
                section: name.to_string(),
                item_id: item_id.to_string(),
            })
    }

    pub async fn remove_item(&self, name: &str, item_id: &str) -> Result<(), ContentError> {
        collections::validate_collection_name(name)?;
        let section = name.to_string();
        let id = item_id.to_string();
        self.update(Location::Collection(name.to_string()), move |record| {
            collections::remove_item(&section, record, &id)
        })
        .await
        .map(|_| ())
    }

    async fn send(&self, command: StoreCommand) -> Result<(), ContentError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| ContentError::StoreUnavailable)
    }
}

struct Backends {
    memory: MemoryBackend,
    files: JsonFileBackend,
    collections: JsonFileBackend,
}

impl Backends {
    fn select(&mut self, location: &Location) -> &mut dyn SectionBackend {
        match location {
            Location::Memory(_) => &mut self.memory,
            Location::File(_) => &mut self.files,
            Location::Collection(_) => &mut self.collections,
        }
    }

    fn handle(&mut self, command: StoreCommand) {
        match command {
            StoreCommand::Get { location, reply } => {
                let result = self.select(&location).load(location.name());
                let _ = reply.send(log_failure(&location, result));
            }
            StoreCommand::GetOrInit {
                location,
                default,
                reply,
            } => {
                let result = self.get_or_init(&location, default);
                let _ = reply.send(log_failure(&location, result));
            }
            StoreCommand::Put {
                location,
                value,
                reply,
            } => {
                let result = self.store(&location, value);
                let _ = reply.send(log_failure(&location, result));
            }
            StoreCommand::Update {
                location,
                apply,
                reply,
            } => {
                let result = self
                    .select(&location)
                    .load(location.name())
                    .and_then(apply)
                    .and_then(|value| self.store(&location, value));
                let _ = reply.send(log_failure(&location, result));
            }
        }
    }

    fn get_or_init(&mut self, location: &Location, default: Value) -> Result<Value, ContentError> {
        match self.select(location).load(location.name())? {
            Some(value) => Ok(value),
            None => {
                debug!("Persisting default content for '{}'", location.name());
                self.store(location, default)
            }
        }
    }

    fn store(&mut self, location: &Location, value: Value) -> Result<Value, ContentError> {
        self.select(location).save(location.name(), &value)?;
        debug!("Stored content for {:?}", location);
        Ok(value)
    }
}

fn log_failure<T>(location: &Location, result: Result<T, ContentError>) -> Result<T, ContentError> {
    if let Err(ContentError::Storage(msg)) = &result {
        error!("Content storage failure for {:?}: {}", location, msg);
    }
    result
}
