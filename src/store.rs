//! Key-value storage behind the habit repository.
//!
//! A store holds JSON values under string keys. It has to be `init`ed before
//! use; `save` writes through to the backing medium immediately.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::fs;
use tracing::{error, warn};

pub const HABITS_KEY: &str = "habits";
pub const ENTRIES_KEY: &str = "entries";
pub const COMMENTS_KEY: &str = "comments";
pub const CHEERS_KEY: &str = "cheers";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store used before init")]
    NotInitialized,
}

/// Reads are served from memory; `init` and `save` may touch the backing medium.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn init(&mut self) -> Result<(), StoreError>;
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    async fn init(&mut self) -> Result<(), StoreError> {
        (**self).init().await
    }

    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).load(key)
    }

    async fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).save(key, value).await
    }
}

/// Reads `key`, falling back to `T::default()` on a missing key or any failure.
pub fn get_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match store.load(key) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(decoded) => decoded,
            Err(err) => {
                error!("failed to decode {key}: {err}");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(err) => {
            error!("failed to read {key}: {err}");
            T::default()
        }
    }
}

/// Writes `value` under `key`. Failures are logged and dropped.
pub async fn set<T, S>(store: &mut S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = match serde_json::to_value(value) {
        Ok(encoded) => encoded,
        Err(err) => {
            error!("failed to encode {key}: {err}");
            return;
        }
    };
    if let Err(err) = store.save(key, encoded).await {
        error!("failed to write {key}: {err}");
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Option<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn init(&mut self) -> Result<(), StoreError> {
        self.values.get_or_insert_with(BTreeMap::new);
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.as_ref().ok_or(StoreError::NotInitialized)?;
        Ok(values.get(key).cloned())
    }

    async fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let values = self.values.as_mut().ok_or(StoreError::NotInitialized)?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// All keys live in one JSON object on disk, rewritten on every save.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: Option<Map<String, Value>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn init(&mut self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|err| self.io_error(err))?;
        }

        let document = match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<Map<String, Value>>(&bytes) {
                Ok(document) => document,
                Err(err) => {
                    warn!("ignoring unreadable data file {}: {err}", self.path.display());
                    Map::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(err) => return Err(self.io_error(err)),
        };
        self.document = Some(document);
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let document = self.document.as_ref().ok_or(StoreError::NotInitialized)?;
        Ok(document.get(key).cloned())
    }

    async fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let document = self.document.as_mut().ok_or(StoreError::NotInitialized)?;
        document.insert(key.to_string(), value);
        let payload = serde_json::to_vec_pretty(document)?;
        fs::write(&self.path, payload).await.map_err(|err| self.io_error(err))
    }
}
