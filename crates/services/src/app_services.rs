use std::path::PathBuf;
use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::poem_fetch_service::PoemFetchService;
use crate::poem_service::PoemService;
use crate::practice_service::PracticeService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    poems: Arc<PoemService>,
    practice: Arc<PracticeService>,
    fetch: Arc<PoemFetchService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, PoemFetchService::from_env()))
    }

    /// Build services backed by a single JSON document.
    #[must_use]
    pub fn new_json(path: impl Into<PathBuf>, clock: Clock) -> Self {
        Self::from_storage(&Storage::json(path), clock, PoemFetchService::from_env())
    }

    /// Build services over an already opened storage.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, fetch: PoemFetchService) -> Self {
        Self {
            poems: Arc::new(PoemService::new(Arc::clone(&storage.poems))),
            practice: Arc::new(PracticeService::new(clock, Arc::clone(&storage.poems))),
            fetch: Arc::new(fetch),
        }
    }

    #[must_use]
    pub fn poems(&self) -> Arc<PoemService> {
        Arc::clone(&self.poems)
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }

    #[must_use]
    pub fn fetch(&self) -> Arc<PoemFetchService> {
        Arc::clone(&self.fetch)
    }
}
