use sqlx::PgPool;
use std::sync::Arc;
use url_resolver::domain::entities::NewUrlMapping;
use url_resolver::domain::repositories::{MappingStore, StoreError};
use url_resolver::infrastructure::persistence::PgMappingStore;

#[sqlx::test(migrations = "./migrations")]
async fn test_insert_and_find(pool: PgPool) {
    let store = PgMappingStore::new(Arc::new(pool));

    let created = store
        .insert(NewUrlMapping::new("https://example.com/a", "K3x9Q1mZ"))
        .await
        .unwrap();

    assert_eq!(created.original_url, "https://example.com/a");
    assert_eq!(created.short_code, "K3x9Q1mZ");

    let by_url = store
        .find_by_original_url("https://example.com/a")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_url.id, created.id);

    let by_code = store.find_by_short_code("K3x9Q1mZ").await.unwrap().unwrap();
    assert_eq!(by_code.original_url, "https://example.com/a");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_not_found(pool: PgPool) {
    let store = PgMappingStore::new(Arc::new(pool));

    assert!(store.find_by_short_code("notfound").await.unwrap().is_none());
    assert!(
        store
            .find_by_original_url("https://example.com/missing")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_lookups_are_exact(pool: PgPool) {
    let store = PgMappingStore::new(Arc::new(pool));
    store
        .insert(NewUrlMapping::new("https://example.com/a", "AbCdEfGh"))
        .await
        .unwrap();

    assert!(store.find_by_short_code("abcdefgh").await.unwrap().is_none());
    assert!(
        store
            .find_by_original_url("https://example.com/a/")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_url_conflict(pool: PgPool) {
    let store = PgMappingStore::new(Arc::new(pool));
    store
        .insert(NewUrlMapping::new("https://example.com/a", "code0001"))
        .await
        .unwrap();

    let err = store
        .insert(NewUrlMapping::new("https://example.com/a", "code0002"))
        .await
        .unwrap_err();

    match err {
        StoreError::Conflict { constraint } => {
            assert_eq!(constraint.as_deref(), Some("url_mappings_original_url_key"));
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_code_conflict(pool: PgPool) {
    let store = PgMappingStore::new(Arc::new(pool));
    store
        .insert(NewUrlMapping::new("https://example.com/a", "code0001"))
        .await
        .unwrap();

    let err = store
        .insert(NewUrlMapping::new("https://example.com/b", "code0001"))
        .await
        .unwrap_err();

    match err {
        StoreError::Conflict { constraint } => {
            assert_eq!(constraint.as_deref(), Some("url_mappings_short_code_key"));
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_exists_by_short_code(pool: PgPool) {
    let store = PgMappingStore::new(Arc::new(pool));
    store
        .insert(NewUrlMapping::new("https://example.com/a", "code0001"))
        .await
        .unwrap();

    assert!(store.exists_by_short_code("code0001").await.unwrap());
    assert!(!store.exists_by_short_code("code0002").await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_count_and_list_recent(pool: PgPool) {
    let store = PgMappingStore::new(Arc::new(pool));
    assert_eq!(store.count().await.unwrap(), 0);

    for i in 1..=3 {
        store
            .insert(NewUrlMapping::new(
                format!("https://example.com/{}", i),
                format!("code000{}", i),
            ))
            .await
            .unwrap();
    }

    assert_eq!(store.count().await.unwrap(), 3);

    let recent = store.list_recent(2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].short_code, "code0003");
    assert_eq!(recent[1].short_code, "code0002");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ping(pool: PgPool) {
    let store = PgMappingStore::new(Arc::new(pool));

    assert!(store.ping().await.is_ok());
}
