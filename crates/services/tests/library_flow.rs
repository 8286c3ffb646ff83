use recite_core::model::PoemDraft;
use recite_core::practice::Judgment;
use recite_core::time::fixed_clock;
use services::{AppServices, PoemFetchService};
use storage::repository::Storage;

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(ToString::to_string).collect()
}

async fn practise_all(app: &AppServices, poem_id: &recite_core::model::PoemId) {
    let practice = app.practice();
    let mut session = practice.start_practice(poem_id).await.expect("start");
    let mut index = 0;
    while session.can_reveal() {
        session.reveal().expect("reveal");
        practice
            .judge(&mut session, index, Judgment::Remembered)
            .await
            .expect("judge");
        index += 1;
    }
    assert!(session.is_complete());
}

#[tokio::test]
async fn sqlite_library_flow_add_practise_delete() {
    let storage = Storage::sqlite("sqlite:file:memdb_library_flow?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let app = AppServices::from_storage(&storage, fixed_clock(), PoemFetchService::new(None));

    let kept = app
        .poems()
        .add_poem(PoemDraft::new("Kept", "Anon", lines(&["a", "", "b", ""])))
        .await
        .expect("add kept");
    let dropped = app
        .poems()
        .add_poem(PoemDraft::new("Dropped", "Anon", lines(&["c"])))
        .await
        .expect("add dropped");

    practise_all(&app, kept.id()).await;
    practise_all(&app, dropped.id()).await;

    app.poems().remove_poem(dropped.id()).await.expect("remove");

    let poems = app.poems().list_poems().await.expect("list");
    assert_eq!(poems.len(), 1);
    let latest = poems[0].latest_session().expect("history");
    assert_eq!((latest.correct(), latest.total()), (2, 2));
    assert_eq!(latest.percentage(), 100);
}

#[tokio::test]
async fn json_library_flow_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("poems.json");

    let app = AppServices::from_storage(
        &Storage::json(&path),
        fixed_clock(),
        PoemFetchService::new(None),
    );
    let poem = app
        .poems()
        .add_poem(PoemDraft::new("Echo", "Anon", lines(&["x", "y", "z"])))
        .await
        .expect("add");
    practise_all(&app, poem.id()).await;

    let reopened = AppServices::from_storage(
        &Storage::json(&path),
        fixed_clock(),
        PoemFetchService::new(None),
    );
    let stored = reopened.poems().poem(poem.id()).await.expect("reload");
    assert_eq!(stored.lines(), poem.lines());
    assert_eq!(stored.sessions().len(), 1);
    assert_eq!(stored.sessions()[0].total(), 3);
}
