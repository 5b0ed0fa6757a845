use redis::{AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::{
    error::{AppError, AppResult},
    models::ListingKind,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// One raw page of scraper results
    ListingPage {
        kind: ListingKind,
        city: String,
        page: u32,
    },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::ListingPage { kind, city, page } => {
                write!(f, "page:{}:{}:{}", kind, city.to_lowercase(), page)
            }
        }
    }
}

/// Creates a Redis client for the scraper page cache
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// A serialized value waiting to be written
struct PendingWrite {
    key: String,
    json: String,
    ttl_secs: u64,
}

/// Redis-backed JSON cache.
///
/// Reads go straight to Redis. Writes are queued to a background task so a
/// slow or unavailable Redis never holds up an ingestion run.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<PendingWrite>,
}

/// Stops the background writer once queued writes are flushed
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates the cache and spawns its writer task
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::run_writer(client, write_rx, shutdown_rx).await;
        });

        (
            Self {
                redis_client,
                write_tx,
            },
            CacheWriterHandle { shutdown_tx },
        )
    }

    async fn run_writer(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<PendingWrite>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(write) = write_rx.recv() => {
                    if let Err(e) = Self::write(&client, write).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    // Senders live in clones of Cache, so drain what is already queued
                    write_rx.close();
                    let mut flushed = 0;
                    while let Some(write) = write_rx.recv().await {
                        match Self::write(&client, write).await {
                            Ok(()) => flushed += 1,
                            Err(e) => tracing::error!(error = %e, "Failed to flush cache write during shutdown"),
                        }
                    }
                    tracing::info!(flushed, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write(client: &Client, write: PendingWrite) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(write.key, write.json, write.ttl_secs).await?;
        Ok(())
    }

    /// Reads and deserializes a cached value; `None` on a miss
    pub async fn get_from_cache<T: DeserializeOwned>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        cached
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })
            })
            .transpose()
    }

    /// Queues a value for writing with the given TTL and returns immediately.
    ///
    /// Serialization and send failures are logged, never returned.
    pub fn set_in_background<T: Serialize>(&self, key: &CacheKey, value: &T, ttl_secs: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            json,
            ttl_secs,
        };

        if self.write_tx.send(write).is_err() {
            tracing::error!(key = %key, "Cache writer is gone, dropping write");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    fn page_key(kind: ListingKind, city: &str, page: u32) -> CacheKey {
        CacheKey::ListingPage {
            kind,
            city: city.to_string(),
            page,
        }
    }

    #[test]
    fn test_cache_key_display_hotel_page() {
        let key = page_key(ListingKind::Hotels, "New York", 3);
        assert_eq!(format!("{}", key), "page:hotels:new york:3");
    }

    #[test]
    fn test_cache_key_display_restaurant_page() {
        let key = page_key(ListingKind::Restaurants, "PARIS", 1);
        assert_eq!(format!("{}", key), "page:restaurants:paris:1");
    }

    #[test]
    fn test_cache_key_distinguishes_kinds() {
        let hotels = page_key(ListingKind::Hotels, "Rome", 1);
        let restaurants = page_key(ListingKind::Restaurants, "Rome", 1);
        assert_ne!(hotels.to_string(), restaurants.to_string());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_cache_miss() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, _handle) = Cache::new(client).await;

        let key = page_key(ListingKind::Hotels, "nonexistent_city_12345", 1);
        let retrieved: Option<serde_json::Value> = cache.get_from_cache(&key).await.unwrap();

        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_cache_writer_flushes_on_shutdown() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, handle) = Cache::new(client.clone()).await;

        let key = page_key(ListingKind::Hotels, "test_shutdown", 1);
        let value = serde_json::json!({ "results": [{ "id": 1 }] });

        cache.set_in_background(&key, &value, 60);
        handle.shutdown().await;
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        let retrieved: Option<serde_json::Value> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(format!("{}", key)).await.unwrap();
    }
}
