use dioxus::prelude::*;
use recite_core::model::{PoemError, QueryError};
use recite_core::practice::PracticeError;
use services::{FetchError, PoemServiceError, PracticeServiceError};

/// User-facing failure categories. Every service error maps onto one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    NotFound,
    NoContentLines,
    MissingQuery,
    InvalidUrl,
    FetchDisabled,
    FetchFailed,
    InvalidPoem,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Unknown => "Something went wrong. Please try again.",
            ViewError::NotFound => "That poem no longer exists.",
            ViewError::NoContentLines => "This poem has no lines to practise.",
            ViewError::MissingQuery => "Enter a poem title or paste a URL",
            ViewError::InvalidUrl => "That does not look like a web address.",
            ViewError::FetchDisabled => "Poem lookup is not configured. Set POEM_AI_API_KEY.",
            ViewError::FetchFailed => "Failed to fetch poem. Please try again.",
            ViewError::InvalidPoem => "The poem came back in an unexpected shape. Please try again.",
        }
    }
}

impl From<&PoemServiceError> for ViewError {
    fn from(err: &PoemServiceError) -> Self {
        match err {
            PoemServiceError::NotFound => ViewError::NotFound,
            PoemServiceError::Poem(PoemError::NoContentLines) => ViewError::NoContentLines,
            PoemServiceError::Poem(_) => ViewError::InvalidPoem,
            _ => ViewError::Unknown,
        }
    }
}

impl From<&PracticeServiceError> for ViewError {
    fn from(err: &PracticeServiceError) -> Self {
        match err {
            PracticeServiceError::NotFound => ViewError::NotFound,
            PracticeServiceError::Practice(PracticeError::NoContentLines) => {
                ViewError::NoContentLines
            }
            _ => ViewError::Unknown,
        }
    }
}

impl From<&FetchError> for ViewError {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Query(QueryError::Missing) => ViewError::MissingQuery,
            FetchError::Query(_) => ViewError::InvalidUrl,
            FetchError::Disabled => ViewError::FetchDisabled,
            FetchError::InvalidStructure(_) | FetchError::Json(_) => ViewError::InvalidPoem,
            _ => ViewError::FetchFailed,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
