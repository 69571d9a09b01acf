use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use shared::models::user::User;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::user::repository::{RepositoryError, UserRepository};

// In-memory user store for use case and controller tests. Writes are checked
// against `_rev` the same way ArangoDB checks them.
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
    revision: Arc<AtomicU64>,
    racing_writer: Arc<AtomicBool>,
}

impl MockUserRepository {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            revision: Arc::new(AtomicU64::new(1)),
            racing_writer: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn stored(&self, id: &str) -> Option<User> {
        self.users.lock().await.iter().find(|u| u.id == id).cloned()
    }

    /// Seeds a user document directly, bypassing the revision check.
    pub async fn put(&self, user: User) {
        let mut users = self.users.lock().await;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
    }

    /// Makes every later `find_by_id` look like another request wrote the
    /// document right after it was read.
    pub fn race_every_read(&self) {
        self.racing_writer.store(true, Ordering::SeqCst);
    }

    fn next_rev(&self) -> String {
        format!("_r{}", self.revision.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.users.lock().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        let mut users = self.users.lock().await;
        let Some(stored) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        let found = stored.clone();
        if self.racing_writer.load(Ordering::SeqCst) {
            stored.rev = self.next_rev();
        }
        Ok(Some(found))
    }

    async fn find_by_username_or_email(&self, username: &str, email: &str) -> Result<Vec<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .filter(|u| u.username == username || u.email == email)
            .cloned()
            .collect())
    }

    async fn update(&self, mut user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().await;
        let existing = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| RepositoryError::NotFound(user.id.clone()))?;
        if existing.rev != user.rev {
            return Err(RepositoryError::Conflict(format!(
                "{} is at {}, write was based on {}",
                user.id, existing.rev, user.rev
            )));
        }
        user.rev = self.next_rev();
        *existing = user.clone();
        Ok(user)
    }
}

pub fn user(key: &str, name: &str, handles: serde_json::Value) -> User {
    serde_json::from_value(serde_json::json!({
        "_id": format!("users/{}", key),
        "_rev": "_r1",
        "name": name,
        "username": name.to_lowercase(),
        "email": format!("{}@example.com", key),
        "platformIds": handles,
    }))
    .unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}
