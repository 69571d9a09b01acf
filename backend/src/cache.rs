use async_trait::async_trait;
use log::{debug, warn};
use redis::Client as RedisClient;
use shared::{CacheKey, CachedValue, CalendarDay, FetchCache, SharedError};
use std::sync::Arc;
use std::time::Duration;

const SCAN_BATCH: usize = 100;

/// Redis-backed daily fetch cache.
///
/// Cache failures never fail a dashboard request: reads degrade to a miss and
/// writes are dropped with a warning. Only invalidation reports errors.
#[derive(Clone)]
pub struct RedisFetchCache {
    client: Arc<RedisClient>,
    key_prefix: String,
    ttl: Duration,
}

impl RedisFetchCache {
    pub fn new(client: RedisClient, key_prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            client: Arc::new(client),
            key_prefix: key_prefix.into(),
            ttl,
        }
    }

    fn full_key(&self, key: &CacheKey) -> String {
        format!("{}:{}", self.key_prefix, key)
    }

    fn user_pattern(&self, user_id: &str) -> String {
        format!("{}:fetch:{}:*", self.key_prefix, user_id)
    }

    async fn connection(&self) -> Result<redis::aio::Connection, redis::RedisError> {
        self.client.get_async_connection().await
    }
}

#[async_trait]
impl FetchCache for RedisFetchCache {
    async fn get(&self, key: &CacheKey) -> shared::Result<Option<CachedValue>> {
        let full_key = self.full_key(key);
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Redis unavailable, treating {} as a miss: {}", full_key, e);
                return Ok(None);
            }
        };

        match redis::cmd("GET")
            .arg(&full_key)
            .query_async::<_, Option<String>>(&mut conn)
            .await
        {
            Ok(Some(raw)) => match serde_json::from_str::<CachedValue>(&raw) {
                Ok(cached) => {
                    debug!("Cache hit for key: {}", full_key);
                    Ok(Some(cached))
                }
                Err(e) => {
                    warn!("Dropping corrupt cache entry {}: {}", full_key, e);
                    let _ = redis::cmd("DEL")
                        .arg(&full_key)
                        .query_async::<_, ()>(&mut conn)
                        .await;
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!("Cache miss for key: {}", full_key);
                Ok(None)
            }
            Err(e) => {
                warn!("Redis GET error for key {}: {}", full_key, e);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &CacheKey, value: serde_json::Value, day: CalendarDay) -> shared::Result<()> {
        let full_key = self.full_key(key);
        let serialized = serde_json::to_string(&CachedValue {
            value,
            last_fetch_day: day,
        })?;

        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Redis unavailable, not caching {}: {}", full_key, e);
                return Ok(());
            }
        };

        let ttl_seconds = self.ttl.as_secs() as usize;
        match redis::cmd("SETEX")
            .arg(&full_key)
            .arg(ttl_seconds)
            .arg(&serialized)
            .query_async::<_, ()>(&mut conn)
            .await
        {
            Ok(()) => debug!("Cached {} for {} (TTL: {}s)", full_key, day, ttl_seconds),
            Err(e) => warn!("Redis SETEX error for key {}: {}", full_key, e),
        }
        Ok(())
    }

    async fn invalidate_user(&self, user_id: &str) -> shared::Result<()> {
        let pattern = self.user_pattern(user_id);
        let mut conn = self
            .connection()
            .await
            .map_err(|e| SharedError::Internal(format!("Failed to get Redis connection: {}", e)))?;

        let mut deleted = 0usize;
        let mut cursor: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| SharedError::Internal(format!("Redis SCAN error: {}", e)))?;

            if !keys.is_empty() {
                let count: usize = redis::cmd("DEL")
                    .arg(&keys)
                    .query_async(&mut conn)
                    .await
                    .map_err(|e| SharedError::Internal(format!("Redis DEL error: {}", e)))?;
                deleted += count;
            }

            // SCAN is done once the cursor wraps back to 0
            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!("Invalidated {} cached payloads for {}", deleted, user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared::{PayloadKind, Platform};

    fn cache() -> RedisFetchCache {
        let client = RedisClient::open("redis://127.0.0.1:6379").unwrap();
        RedisFetchCache::new(client, "cp_tracker", Duration::from_secs(172_800))
    }

    #[test]
    fn test_full_key_is_prefixed() {
        let key = CacheKey::new("users/42", Platform::Codeforces, PayloadKind::RatingHistory);
        assert_eq!(cache().full_key(&key), "cp_tracker:fetch:users/42:codeforces:rating_history");
    }

    #[test]
    fn test_user_pattern_matches_only_that_user() {
        let c = cache();
        assert_eq!(c.user_pattern("users/42"), "cp_tracker:fetch:users/42:*");

        let key = CacheKey::new("users/42", Platform::LeetCode, PayloadKind::Profile);
        assert!(c.full_key(&key).starts_with(c.user_pattern("users/42").trim_end_matches('*')));
    }

    #[tokio::test]
    async fn test_unreachable_redis_degrades_to_miss() {
        let client = RedisClient::open("redis://127.0.0.1:1").unwrap();
        let cache = RedisFetchCache::new(client, "cp_tracker", Duration::from_secs(60));
        let key = CacheKey::new("u1", Platform::CodeChef, PayloadKind::Profile);

        assert_eq!(cache.get(&key).await.unwrap(), None);
        let day = CalendarDay::from_ymd(2024, 1, 1).unwrap();
        assert!(cache.set(&key, serde_json::json!({}), day).await.is_ok());
    }
}
