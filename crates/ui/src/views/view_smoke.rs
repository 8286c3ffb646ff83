use std::sync::Arc;

use chrono::NaiveDate;
use recite_core::model::{Poem, PoemDraft, PoemId, Session, ValidatedPoem};
use storage::repository::{PoemRepository, Storage, StorageError};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_repo};

fn draft(title: &str, author: &str, lines: &[&str]) -> ValidatedPoem {
    PoemDraft::new(title, author, lines.iter().map(ToString::to_string).collect())
        .validate()
        .unwrap()
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_lists_poems_with_scores() {
    let storage = Storage::in_memory();
    let practised = storage
        .poems
        .insert_poem(draft("Ozymandias", "Percy Bysshe Shelley", &["I met", "a traveller"]))
        .await
        .unwrap();
    storage
        .poems
        .insert_poem(draft("Sonnet 18", "William Shakespeare", &["Shall I"]))
        .await
        .unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    storage
        .poems
        .append_session(practised.id(), &Session::new(day, 2, 2).unwrap())
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::Home, &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Ozymandias"), "missing title in {html}");
    assert!(html.contains("100%"), "missing score in {html}");
    assert!(html.contains("score-high"), "missing band in {html}");
    assert!(html.contains("Not practised"), "missing unpractised label in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_empty_state() {
    let storage = Storage::in_memory();
    let mut harness = setup_view_harness(ViewKind::Home, &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No poems yet"), "missing empty state in {html}");
    assert!(html.contains("Add poem"), "missing add button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_smoke_renders_header_and_reveal() {
    let storage = Storage::in_memory();
    let poem = storage
        .poems
        .insert_poem(draft("Dust of Snow", "Robert Frost", &["The way a crow", "", "Has given"]))
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::Practice(poem.id().to_string()), &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Dust of Snow"), "missing title in {html}");
    assert!(html.contains("Robert Frost"), "missing author in {html}");
    assert!(html.contains("Reveal next line"), "missing reveal in {html}");
    assert!(html.contains("0 / 2 lines"), "missing progress in {html}");
    assert!(!html.contains("The way a crow"), "line shown before reveal in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_smoke_reports_missing_poem() {
    let storage = Storage::in_memory();
    let mut harness = setup_view_harness(ViewKind::Practice("gone".into()), &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("no longer exists"), "missing error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_lists_sessions() {
    let storage = Storage::in_memory();
    let poem = storage
        .poems
        .insert_poem(draft("Tide", "Anon", &["in", "out"]))
        .await
        .unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
    storage
        .poems
        .append_session(poem.id(), &Session::new(day, 1, 2).unwrap())
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::History(poem.id().to_string()), &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Feb 3, 2024"), "missing date in {html}");
    assert!(html.contains("1/2 (50%)"), "missing score in {html}");
}

struct FailingRepo;

#[async_trait::async_trait]
impl PoemRepository for FailingRepo {
    async fn list_poems(&self) -> Result<Vec<Poem>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn insert_poem(&self, _poem: ValidatedPoem) -> Result<Poem, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn get_poem(&self, _id: &PoemId) -> Result<Option<Poem>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn delete_poem(&self, _id: &PoemId) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn append_session(&self, _id: &PoemId, _session: &Session) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_error_state() {
    let mut harness = setup_view_harness_with_repo(ViewKind::Home, Arc::new(FailingRepo));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}
