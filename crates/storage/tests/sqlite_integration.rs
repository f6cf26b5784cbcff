use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrip_overwrites_value() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.get("courseProgress").await.unwrap().is_none());

    repo.put("courseProgress", r#"{"completedItems":{}}"#)
        .await
        .unwrap();
    repo.put(
        "courseProgress",
        r#"{"completedItems":{"section-0-item-0":true}}"#,
    )
    .await
    .unwrap();

    let value = repo.get("courseProgress").await.unwrap();
    assert_eq!(
        value.as_deref(),
        Some(r#"{"completedItems":{"section-0-item-0":true}}"#)
    );
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.put("k", "v").await.unwrap();
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn storage_sqlite_exposes_kv() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.kv.put("a", "1").await.unwrap();
    storage.kv.put("b", "2").await.unwrap();
    assert_eq!(storage.kv.get("a").await.unwrap().as_deref(), Some("1"));
    assert_eq!(storage.kv.get("b").await.unwrap().as_deref(), Some("2"));
}
