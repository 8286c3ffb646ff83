use chrono::NaiveDate;
use recite_core::model::{PoemDraft, Session};
use storage::json::JsonFileRepository;
use storage::repository::{PoemRepository, StorageError};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

#[tokio::test]
async fn missing_file_reads_as_empty_collection() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("poems.json"));
    assert!(repo.list_poems().await.unwrap().is_empty());
}

#[tokio::test]
async fn json_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("poems.json");

    let repo = JsonFileRepository::new(&path);
    let draft = PoemDraft::new("Tide", "Anon", vec!["in".into(), String::new(), "out".into()]);
    let poem = repo.insert_poem(draft.validate().unwrap()).await.unwrap();
    repo.append_session(poem.id(), &Session::new(day(), 1, 2).unwrap())
        .await
        .unwrap();

    let reopened = JsonFileRepository::new(&path);
    let poems = reopened.list_poems().await.unwrap();
    assert_eq!(poems.len(), 1);
    assert_eq!(poems[0].lines(), poem.lines());
    assert_eq!(poems[0].sessions(), &[Session::new(day(), 1, 2).unwrap()]);
}

#[tokio::test]
async fn json_store_reads_browser_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.json");
    std::fs::write(
        &path,
        r#"[{"id":"lx2k9a1b2c","title":"Ozymandias","author":"Percy Bysshe Shelley",
            "lines":["I met a traveller from an antique land",""],
            "sessions":[{"date":"2024-01-15","correct":1,"total":1}]},
           {"id":"m01z8q7r6s","title":"Sonnet 18","author":"William Shakespeare",
            "lines":["Shall I compare thee to a summer's day?"]}]"#,
    )
    .unwrap();

    let repo = JsonFileRepository::new(&path);
    let poems = repo.list_poems().await.unwrap();
    assert_eq!(poems.len(), 2);
    assert_eq!(poems[0].id().as_str(), "lx2k9a1b2c");
    assert_eq!(poems[0].sessions().len(), 1);
    assert!(poems[1].sessions().is_empty());

    repo.delete_poem(poems[0].id()).await.unwrap();
    let left = repo.list_poems().await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].title(), "Sonnet 18");
}

#[tokio::test]
async fn corrupt_document_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("poems.json");
    std::fs::write(&path, "{ not a list").unwrap();

    let err = JsonFileRepository::new(&path).list_poems().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}
