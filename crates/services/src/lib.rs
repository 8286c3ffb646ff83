#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod poem_fetch_service;
pub mod poem_service;
pub mod practice_service;

pub use recite_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, FetchError, PoemServiceError, PracticeServiceError};
pub use poem_fetch_service::{PoemFetchConfig, PoemFetchService, parse_poem_reply};
pub use poem_service::PoemService;
pub use practice_service::{JudgeResult, PracticeService};
