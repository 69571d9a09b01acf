use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use crate::calendar::CalendarDay;
use crate::error::{Result, SharedError};
use crate::models::platform::Platform;

/// Which upstream call a cached payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Profile,
    Submissions,
    RatingHistory,
    UserInfo,
    Contest,
    SolvedCount,
}

impl PayloadKind {
    fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Profile => "profile",
            PayloadKind::Submissions => "submissions",
            PayloadKind::RatingHistory => "rating_history",
            PayloadKind::UserInfo => "user_info",
            PayloadKind::Contest => "contest",
            PayloadKind::SolvedCount => "solved_count",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub user_id: String,
    pub platform: Platform,
    pub kind: PayloadKind,
}

impl CacheKey {
    pub fn new(user_id: impl Into<String>, platform: Platform, kind: PayloadKind) -> Self {
        Self {
            user_id: user_id.into(),
            platform,
            kind,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetch:{}:{}:{}", self.user_id, self.platform, self.kind.as_str())
    }
}

/// A cached payload and the UTC day it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedValue {
    pub value: serde_json::Value,
    pub last_fetch_day: CalendarDay,
}

impl CachedValue {
    pub fn is_fresh(&self, today: CalendarDay) -> bool {
        self.last_fetch_day == today
    }
}

/// Daily fetch cache injected into the dashboard flow. The core never reads it.
#[async_trait]
pub trait FetchCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedValue>>;
    async fn set(&self, key: &CacheKey, value: serde_json::Value, day: CalendarDay) -> Result<()>;
    /// Drops every cached payload for a user, e.g. after their handles change.
    async fn invalidate_user(&self, user_id: &str) -> Result<()>;
}

/// Process-local cache for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryFetchCache {
    entries: Mutex<HashMap<CacheKey, CachedValue>>,
}

impl InMemoryFetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<CacheKey, CachedValue>>> {
        self.entries
            .lock()
            .map_err(|_| SharedError::Internal("fetch cache lock poisoned".to_string()))
    }
}

#[async_trait]
impl FetchCache for InMemoryFetchCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedValue>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &CacheKey, value: serde_json::Value, day: CalendarDay) -> Result<()> {
        self.lock()?.insert(
            key.clone(),
            CachedValue {
                value,
                last_fetch_day: day,
            },
        );
        Ok(())
    }

    async fn invalidate_user(&self, user_id: &str) -> Result<()> {
        self.lock()?.retain(|key, _| key.user_id != user_id);
        Ok(())
    }
}
