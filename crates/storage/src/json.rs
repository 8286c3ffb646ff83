//! Single-document JSON store.
//!
//! Every operation reads the whole collection, changes it and writes it back.
//! That is fine for a personal collection of a few dozen poems.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use recite_core::model::{Poem, PoemId, Session, ValidatedPoem};
use tokio::sync::Mutex;

use crate::repository::{PoemRecord, PoemRepository, SessionRecord, Storage, StorageError};

fn io_err(e: &std::io::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[derive(Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
    // Serializes read-modify-write cycles.
    lock: Arc<Mutex<()>>,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or empty file reads as an empty collection.
    async fn read_all(&self) -> Result<Vec<PoemRecord>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(&e)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(ser)
    }

    async fn write_all(&self, records: &[PoemRecord]) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(records).map_err(ser)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| io_err(&e))?;
        }
        tokio::fs::write(&self.path, raw).await.map_err(|e| io_err(&e))
    }
}

#[async_trait]
impl PoemRepository for JsonFileRepository {
    async fn list_poems(&self) -> Result<Vec<Poem>, StorageError> {
        let _guard = self.lock.lock().await;
        self.read_all()
            .await?
            .into_iter()
            .map(PoemRecord::into_poem)
            .collect()
    }

    async fn insert_poem(&self, poem: ValidatedPoem) -> Result<Poem, StorageError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        let mut id = PoemId::generate();
        while records.iter().any(|r| r.id == id.as_str()) {
            id = PoemId::generate();
        }
        let poem = poem.assign_id(id);
        records.push(PoemRecord::from_poem(&poem));
        self.write_all(&records).await?;
        tracing::debug!(path = %self.path.display(), poems = records.len(), "collection written");
        Ok(poem)
    }

    async fn get_poem(&self, id: &PoemId) -> Result<Option<Poem>, StorageError> {
        let _guard = self.lock.lock().await;
        self.read_all()
            .await?
            .into_iter()
            .find(|r| r.id == id.as_str())
            .map(PoemRecord::into_poem)
            .transpose()
    }

    async fn delete_poem(&self, id: &PoemId) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        let before = records.len();
        records.retain(|r| r.id != id.as_str());
        if records.len() == before {
            return Ok(());
        }
        self.write_all(&records).await
    }

    async fn append_session(&self, id: &PoemId, session: &Session) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id.as_str())
            .ok_or(StorageError::NotFound)?;
        record.sessions.push(SessionRecord::from_session(session));
        self.write_all(&records).await
    }
}

impl Storage {
    /// Build a `Storage` backed by a JSON document at `path`.
    #[must_use]
    pub fn json(path: impl Into<PathBuf>) -> Self {
        let poems: Arc<dyn PoemRepository> = Arc::new(JsonFileRepository::new(path));
        Self { poems }
    }
}
