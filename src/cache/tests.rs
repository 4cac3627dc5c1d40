use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::*;

fn config() -> CacheConfig {
    CacheConfig {
        retry_min_delay_ms: 1,
        retry_max_delay_ms: 5,
        ..CacheConfig::default()
    }
}

fn counting_fetch(
    calls: &AtomicUsize,
    value: u32,
) -> impl FnMut() -> std::future::Ready<stockroom_client::Result<u32>> + '_ {
    move || {
        calls.fetch_add(1, Ordering::SeqCst);
        std::future::ready(Ok(value))
    }
}

#[tokio::test]
async fn test_fresh_entry_is_served_from_cache() {
    let cache = QueryCache::new(&config());
    let calls = &AtomicUsize::new(0);
    let key = QueryKey::from(["order", "1"]);

    let first: u32 = cache.fetch(key.clone(), counting_fetch(calls, 7)).await.unwrap();
    let second: u32 = cache.fetch(key, counting_fetch(calls, 8)).await.unwrap();

    assert_eq!((first, second), (7, 7));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_fetches_share_one_request() {
    let cache = QueryCache::new(&config());
    let calls = &AtomicUsize::new(0);
    let key = QueryKey::from(["orders", "list"]);

    let slow = move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok::<_, ClientError>(vec![1_i64, 2, 3])
    };

    let (a, b, c) = tokio::join!(
        cache.fetch(key.clone(), slow),
        cache.fetch(key.clone(), slow),
        cache.fetch(key.clone(), slow),
    );

    assert_eq!(a.unwrap(), vec![1, 2, 3]);
    assert_eq!(b.unwrap(), vec![1, 2, 3]);
    assert_eq!(c.unwrap(), vec![1, 2, 3]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_stale_entry_is_refetched() {
    let cache = QueryCache::new(&CacheConfig {
        stale_time_secs: 1,
        ..config()
    });
    let calls = &AtomicUsize::new(0);
    let key = QueryKey::from(["customers"]);

    let _: u32 = cache.fetch(key.clone(), counting_fetch(calls, 1)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_100)).await;
    let value: u32 = cache.fetch(key, counting_fetch(calls, 2)).await.unwrap();

    assert_eq!(value, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_invalidate_by_prefix() {
    let cache = QueryCache::new(&config());
    cache.set(keys::order(1), 1_u32).await;
    cache.set(keys::order_notes(1), 2_u32).await;
    cache.set(keys::order(2), 3_u32).await;
    cache.set(keys::orders().child("list"), 4_u32).await;

    cache.invalidate(&keys::order(1)).await;

    assert!(!cache.contains(&keys::order(1)).await);
    assert!(!cache.contains(&keys::order_notes(1)).await);
    assert!(cache.contains(&keys::order(2)).await);
    assert!(cache.contains(&keys::orders().child("list")).await);
}

#[tokio::test]
async fn test_invalidated_key_is_refetched() {
    let cache = QueryCache::new(&config());
    let calls = &AtomicUsize::new(0);
    let key = keys::products_list(&Default::default());

    let _: u32 = cache.fetch(key.clone(), counting_fetch(calls, 1)).await.unwrap();
    cache.invalidate(&keys::products()).await;
    let value: u32 = cache.fetch(key, counting_fetch(calls, 2)).await.unwrap();

    assert_eq!(value, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let cache = QueryCache::new(&config());
    let calls = &AtomicUsize::new(0);

    let value: u32 = cache
        .fetch(QueryKey::from(["brand"]), move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(ClientError::Api {
                    status: 503,
                    message: "try later".to_string(),
                })
            } else {
                Ok(9)
            }
        })
        .await
        .unwrap();

    assert_eq!(value, 9);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_client_errors_are_not_retried_or_cached() {
    let cache = QueryCache::new(&config());
    let calls = &AtomicUsize::new(0);
    let key = QueryKey::from(["order", "404"]);

    let err = cache
        .fetch::<u32, _, _>(key.clone(), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::Api {
                status: 404,
                message: "order not found".to_string(),
            })
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Fetch(_)));
    assert!(err.client().unwrap().is_not_found());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!cache.contains(&key).await);
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let cache = QueryCache::new(&config());
    let calls = &AtomicUsize::new(0);

    let err = cache
        .fetch::<u32, _, _>(QueryKey::from(["me"]), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::Unauthorized)
        })
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_set_and_get() {
    let cache = QueryCache::new(&config());
    let key = keys::customer(3);

    assert_eq!(cache.get::<String>(&key).await, None);
    cache.set(key.clone(), "Ana".to_string()).await;
    assert_eq!(cache.get::<String>(&key).await.as_deref(), Some("Ana"));
    // Wrong type reads as a miss.
    assert_eq!(cache.get::<u32>(&key).await, None);
}

#[tokio::test]
async fn test_type_mismatch_on_fetch() {
    let cache = QueryCache::new(&config());
    let key = keys::customer(3);
    cache.set(key.clone(), "Ana".to_string()).await;

    let result = cache
        .fetch::<u32, _, _>(key, move || async move { Ok(1) })
        .await;
    assert!(matches!(result, Err(Error::CacheType(_))));
}

#[tokio::test]
async fn test_clear() {
    let cache = QueryCache::new(&config());
    cache.set(keys::order(1), 1_u32).await;
    cache.set(keys::product(1), 2_u32).await;

    cache.clear().await;

    assert!(!cache.contains(&keys::order(1)).await);
    assert!(!cache.contains(&keys::product(1)).await);
}

// ============================================================================
// Writes during a fetch
// ============================================================================

/// Slow fetch returning how many times it has run so far.
async fn slow_fetch(calls: &AtomicUsize) -> stockroom_client::Result<u32> {
    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok(calls.fetch_add(1, Ordering::SeqCst) as u32 + 1)
}

#[tokio::test]
async fn test_invalidate_during_fetch_refetches() {
    let cache = QueryCache::new(&config());
    let calls = &AtomicUsize::new(0);
    let key = keys::order(5);

    let fetch = cache.fetch::<u32, _, _>(key.clone(), || slow_fetch(calls));
    let (value, ()) = tokio::join!(fetch, async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache.invalidate(&keys::order(5)).await;
    });

    // The first result predates the invalidation and is discarded.
    assert_eq!(value.unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.get::<u32>(&key).await, Some(2));
}

#[tokio::test]
async fn test_clear_during_fetch_refetches() {
    let cache = QueryCache::new(&config());
    let calls = &AtomicUsize::new(0);
    let key = keys::product(5);

    let fetch = cache.fetch::<u32, _, _>(key.clone(), || slow_fetch(calls));
    let (value, ()) = tokio::join!(fetch, async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache.clear().await;
    });

    assert_eq!(value.unwrap(), 2);
    assert_eq!(cache.get::<u32>(&key).await, Some(2));
}

#[tokio::test]
async fn test_set_during_fetch_is_kept() {
    let cache = QueryCache::new(&config());
    let calls = &AtomicUsize::new(0);
    let key = keys::order(6);

    let fetch = cache.fetch::<u32, _, _>(key.clone(), || slow_fetch(calls));
    let (value, ()) = tokio::join!(fetch, async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache.set(key.clone(), 9_u32).await;
    });

    assert_eq!(value.unwrap(), 9);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.get::<u32>(&key).await, Some(9));
}

#[tokio::test]
async fn test_unrelated_invalidate_during_fetch_is_ignored() {
    let cache = QueryCache::new(&config());
    let calls = &AtomicUsize::new(0);
    let key = keys::order(7);

    let fetch = cache.fetch::<u32, _, _>(key.clone(), || slow_fetch(calls));
    let (value, ()) = tokio::join!(fetch, async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache.invalidate(&keys::products()).await;
    });

    assert_eq!(value.unwrap(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
