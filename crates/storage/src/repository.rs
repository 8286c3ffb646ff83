use async_trait::async_trait;
use chrono::NaiveDate;
use recite_core::model::{Poem, PoemId, Session, ValidatedPoem};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Persisted shape of a session, `{date, correct, total}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: NaiveDate,
    pub correct: u32,
    pub total: u32,
}

impl SessionRecord {
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            date: session.date(),
            correct: session.correct(),
            total: session.total(),
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if `correct` exceeds `total`.
    pub fn into_session(self) -> Result<Session, StorageError> {
        Session::new(self.date, self.correct, self.total)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Persisted shape of a poem with its history.
///
/// Field names match the collection document the browser version kept, so an
/// exported collection loads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoemRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    pub lines: Vec<String>,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
}

impl PoemRecord {
    #[must_use]
    pub fn from_poem(poem: &Poem) -> Self {
        Self {
            id: poem.id().to_string(),
            title: poem.title().to_owned(),
            author: poem.author().to_owned(),
            lines: poem.lines().to_vec(),
            sessions: poem.sessions().iter().map(SessionRecord::from_session).collect(),
        }
    }

    /// Convert the record back into a domain `Poem`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the id, title or any session is invalid.
    pub fn into_poem(self) -> Result<Poem, StorageError> {
        let id = PoemId::new(self.id).map_err(|e| StorageError::Serialization(e.to_string()))?;
        let sessions = self
            .sessions
            .into_iter()
            .map(SessionRecord::into_session)
            .collect::<Result<Vec<_>, _>>()?;
        Poem::from_persisted(id, self.title, self.author, self.lines, sessions)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

//
// ─── REPOSITORY CONTRACT ───────────────────────────────────────────────────────
//

/// Repository contract for poems and their practice history.
#[async_trait]
pub trait PoemRepository: Send + Sync {
    /// All poems in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be read.
    async fn list_poems(&self) -> Result<Vec<Poem>, StorageError>;

    /// Store a new poem under a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the poem cannot be stored.
    async fn insert_poem(&self, poem: ValidatedPoem) -> Result<Poem, StorageError>;

    /// Fetch a poem by id; `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    async fn get_poem(&self, id: &PoemId) -> Result<Option<Poem>, StorageError>;

    /// Remove a poem and its history. Removing an unknown id is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    async fn delete_poem(&self, id: &PoemId) -> Result<(), StorageError>;

    /// Append a completed session to a poem's history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the poem no longer exists.
    async fn append_session(&self, id: &PoemId, session: &Session) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    poems: Arc<Mutex<Vec<Poem>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PoemRepository for InMemoryRepository {
    async fn list_poems(&self) -> Result<Vec<Poem>, StorageError> {
        let guard = self
            .poems
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn insert_poem(&self, poem: ValidatedPoem) -> Result<Poem, StorageError> {
        let mut guard = self
            .poems
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let poem = poem.assign_id(PoemId::generate());
        guard.push(poem.clone());
        Ok(poem)
    }

    async fn get_poem(&self, id: &PoemId) -> Result<Option<Poem>, StorageError> {
        let guard = self
            .poems
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().find(|poem| poem.id() == id).cloned())
    }

    async fn delete_poem(&self, id: &PoemId) -> Result<(), StorageError> {
        let mut guard = self
            .poems
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.retain(|poem| poem.id() != id);
        Ok(())
    }

    async fn append_session(&self, id: &PoemId, session: &Session) -> Result<(), StorageError> {
        let mut guard = self
            .poems
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let poem = guard
            .iter_mut()
            .find(|poem| poem.id() == id)
            .ok_or(StorageError::NotFound)?;
        poem.record_session(*session);
        Ok(())
    }
}

/// Poem repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub poems: Arc<dyn PoemRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let poems: Arc<dyn PoemRepository> = Arc::new(InMemoryRepository::new());
        Self { poems }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recite_core::model::PoemDraft;

    fn draft(title: &str) -> ValidatedPoem {
        PoemDraft::new(title, "Anon", vec!["line one".into(), String::new(), "line two".into()])
            .validate()
            .unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids_and_keeps_order() {
        let repo = InMemoryRepository::new();
        let a = repo.insert_poem(draft("A")).await.unwrap();
        let b = repo.insert_poem(draft("B")).await.unwrap();
        assert_ne!(a.id(), b.id());

        let titles: Vec<_> = repo
            .list_poems()
            .await
            .unwrap()
            .iter()
            .map(|p| p.title().to_string())
            .collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn delete_removes_only_that_poem() {
        let repo = InMemoryRepository::new();
        let keep = repo.insert_poem(draft("Keep")).await.unwrap();
        let gone = repo.insert_poem(draft("Drop")).await.unwrap();
        repo.append_session(keep.id(), &Session::new(day(), 1, 2).unwrap())
            .await
            .unwrap();

        repo.delete_poem(gone.id()).await.unwrap();
        repo.delete_poem(&PoemId::new("missing").unwrap()).await.unwrap();

        let poems = repo.list_poems().await.unwrap();
        assert_eq!(poems.len(), 1);
        assert_eq!(poems[0].id(), keep.id());
        assert_eq!(poems[0].sessions().len(), 1);
    }

    #[tokio::test]
    async fn append_session_to_missing_poem_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo
            .append_session(&PoemId::new("gone").unwrap(), &Session::new(day(), 0, 1).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[test]
    fn record_reads_document_without_sessions_key() {
        let json = r#"{"id":"abc","title":"T","author":"A","lines":["x",""]}"#;
        let record: PoemRecord = serde_json::from_str(json).unwrap();
        let poem = record.into_poem().unwrap();
        assert!(poem.sessions().is_empty());
        assert_eq!(poem.lines().len(), 2);
    }

    #[test]
    fn record_rejects_inconsistent_session() {
        let json = r#"{"id":"abc","title":"T","author":"A","lines":["x"],
            "sessions":[{"date":"2024-01-02","correct":3,"total":1}]}"#;
        let record: PoemRecord = serde_json::from_str(json).unwrap();
        assert!(matches!(record.into_poem(), Err(StorageError::Serialization(_))));
    }
}
