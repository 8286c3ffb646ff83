use chrono::NaiveDate;
use recite_core::model::{PoemDraft, PoemId, Session, ValidatedPoem};
use storage::repository::{PoemRepository, StorageError};
use storage::sqlite::SqliteRepository;

fn draft(title: &str, lines: &[&str]) -> ValidatedPoem {
    PoemDraft::new(title, "Anon", lines.iter().map(ToString::to_string).collect())
        .validate()
        .unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
}

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_roundtrip_keeps_lines_and_history_order() {
    let repo = connect("memdb_poem_roundtrip").await;

    let poem = repo
        .insert_poem(draft("Stanzas", &["A", "", "  ", "B", ""]))
        .await
        .unwrap();
    repo.append_session(poem.id(), &Session::new(day(1), 1, 2).unwrap())
        .await
        .unwrap();
    repo.append_session(poem.id(), &Session::new(day(3), 2, 2).unwrap())
        .await
        .unwrap();

    let fetched = repo.get_poem(poem.id()).await.unwrap().expect("poem");
    assert_eq!(fetched.lines(), poem.lines());
    assert_eq!(fetched.content_line_count(), 2);
    let dates: Vec<_> = fetched.sessions().iter().map(Session::date).collect();
    assert_eq!(dates, vec![day(1), day(3)]);
    assert_eq!(fetched.latest_session().unwrap().percentage(), 100);
}

#[tokio::test]
async fn sqlite_lists_in_insertion_order_and_deletes_one() {
    let repo = connect("memdb_poem_delete").await;

    let first = repo.insert_poem(draft("First", &["a"])).await.unwrap();
    let second = repo.insert_poem(draft("Second", &["b"])).await.unwrap();
    let third = repo.insert_poem(draft("Third", &["c"])).await.unwrap();
    repo.append_session(first.id(), &Session::new(day(2), 1, 1).unwrap())
        .await
        .unwrap();
    repo.append_session(second.id(), &Session::new(day(2), 0, 1).unwrap())
        .await
        .unwrap();

    repo.delete_poem(second.id()).await.unwrap();
    // Unknown ids are ignored.
    repo.delete_poem(&PoemId::new("nope").unwrap()).await.unwrap();

    let poems = repo.list_poems().await.unwrap();
    let ids: Vec<_> = poems.iter().map(|p| p.id().clone()).collect();
    assert_eq!(ids, vec![first.id().clone(), third.id().clone()]);
    assert_eq!(poems[0].sessions().len(), 1);
    assert!(poems[1].sessions().is_empty());
    assert!(repo.get_poem(second.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_append_to_missing_poem_is_not_found() {
    let repo = connect("memdb_poem_missing").await;
    let err = repo
        .append_session(&PoemId::new("ghost").unwrap(), &Session::new(day(5), 0, 0).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = connect("memdb_poem_migrate").await;
    repo.insert_poem(draft("Kept", &["x"])).await.unwrap();
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.list_poems().await.unwrap().len(), 1);
}
