mod common;

use std::collections::HashSet;
use std::sync::Arc;
use url_resolver::application::services::cache_aside::{DEFAULT_CACHE_TTL, code_key, url_key};
use url_resolver::application::services::code_generator::{CODE_LENGTH, DEFAULT_MAX_ATTEMPTS};
use url_resolver::infrastructure::cache::{CacheLayer, MemoryCache};
use url_resolver::state::AppState;

#[tokio::test]
async fn test_shorten_is_idempotent() {
    let (state, store, _) = common::memory_state(None);

    let first = state
        .shorten_engine
        .shorten("https://example.com/a")
        .await
        .unwrap();
    let second = state
        .shorten_engine
        .shorten("https://example.com/a")
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), CODE_LENGTH);
    assert_eq!(store.len().unwrap(), 1);
}

#[tokio::test]
async fn test_expand_inverts_shorten() {
    let (state, _, _) = common::memory_state(None);

    let code = state
        .shorten_engine
        .shorten("https://example.com/a?q=1")
        .await
        .unwrap();
    let url = state.expand_engine.expand(&code).await.unwrap();

    assert_eq!(url.as_deref(), Some("https://example.com/a?q=1"));
}

#[tokio::test]
async fn test_distinct_urls_get_distinct_codes() {
    let (state, store, _) = common::memory_state(None);

    let mut codes = HashSet::new();
    for i in 0..50 {
        let url = format!("https://example.com/page/{}", i);
        let code = state.shorten_engine.shorten(&url).await.unwrap();
        assert!(codes.insert(code.clone()), "code {} issued twice", code);
        assert_eq!(
            state.expand_engine.expand(&code).await.unwrap().as_deref(),
            Some(url.as_str())
        );
    }

    assert_eq!(store.len().unwrap(), 50);
}

#[tokio::test]
async fn test_cache_is_filled_in_both_directions() {
    let (state, _, cache) = common::memory_state(None);

    let code = state
        .shorten_engine
        .shorten("https://example.com/a")
        .await
        .unwrap();

    assert_eq!(
        cache.get(&code_key(&code)).await.unwrap().as_deref(),
        Some("https://example.com/a")
    );
    assert_eq!(
        cache
            .get(&url_key("https://example.com/a"))
            .await
            .unwrap()
            .as_deref(),
        Some(code.as_str())
    );
}

#[tokio::test]
async fn test_cleared_cache_is_repaired_from_store() {
    let (state, store, cache) = common::memory_state(None);

    let code = state
        .shorten_engine
        .shorten("https://example.com/a")
        .await
        .unwrap();
    cache.clear();
    assert!(cache.is_empty().await);

    let url = state.expand_engine.expand(&code).await.unwrap();
    assert_eq!(url.as_deref(), Some("https://example.com/a"));
    assert_eq!(cache.len().await, 2);

    cache.clear();
    let again = state
        .shorten_engine
        .shorten("https://example.com/a")
        .await
        .unwrap();
    assert_eq!(again, code);
    assert_eq!(cache.len().await, 2);
    assert_eq!(store.len().unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_shorten_of_new_url_converges() {
    let store = Arc::new(common::RacingStore::new());
    let state = AppState::new(
        store.clone(),
        Arc::new(MemoryCache::new()),
        DEFAULT_CACHE_TTL,
        DEFAULT_MAX_ATTEMPTS,
        None,
    );

    let (a, b) = tokio::join!(
        state.shorten_engine.shorten("https://example.com/race"),
        state.shorten_engine.shorten("https://example.com/race"),
    );

    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a, b);
    assert_eq!(store.len().unwrap(), 1);
}

#[tokio::test]
async fn test_expand_unknown_code_is_none() {
    let (state, _, cache) = common::memory_state(None);

    let url = state.expand_engine.expand("doesNotExist").await.unwrap();

    assert_eq!(url, None);
    assert!(cache.is_empty().await);
}
