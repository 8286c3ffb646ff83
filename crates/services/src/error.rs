//! Shared error types for the services crate.

use thiserror::Error;

use recite_core::model::{PoemError, QueryError, SessionError};
use recite_core::practice::PracticeError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `PoemService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PoemServiceError {
    #[error("poem not found")]
    NotFound,
    #[error(transparent)]
    Poem(#[from] PoemError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `PracticeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeServiceError {
    #[error("poem not found")]
    NotFound,
    #[error(transparent)]
    Practice(#[from] PracticeError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `PoemFetchService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("poem lookup is not configured")]
    Disabled,
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("the model returned an empty response")]
    EmptyResponse,
    #[error("invalid poem structure: {0}")]
    InvalidStructure(String),
    #[error("could not parse the model reply: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
