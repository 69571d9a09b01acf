use arangors::client::reqwest::ReqwestClient;
use arangors::document::options::UpdateOptions;
use arangors::Database;
use async_trait::async_trait;
use shared::models::user::User;

pub const USERS_COLLECTION: &str = "users";

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("Write conflict: {0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(String),
}

// ArangoDB answers 412 with errorNum 1200 when `_rev` no longer matches.
const HTTP_PRECONDITION_FAILED: u16 = 412;
const ERROR_ARANGO_CONFLICT: u16 = 1200;

impl From<arangors::ClientError> for RepositoryError {
    fn from(err: arangors::ClientError) -> Self {
        match err {
            arangors::ClientError::Arango(ref e)
                if e.code() == HTTP_PRECONDITION_FAILED || e.error_num() == ERROR_ARANGO_CONFLICT =>
            {
                RepositoryError::Conflict(e.message().to_string())
            }
            other => RepositoryError::Database(other.to_string()),
        }
    }
}

/// `users/42` stays as is, a bare `42` gets the collection prefix.
pub fn document_id(id: &str) -> String {
    if id.contains('/') {
        id.to_string()
    } else {
        format!("{}/{}", USERS_COLLECTION, id)
    }
}

fn document_key(id: &str) -> &str {
    id.split_once('/').map(|(_, key)| key).unwrap_or(id)
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError>;
    /// Users whose username or email equals one of the given values.
    async fn find_by_username_or_email(&self, username: &str, email: &str) -> Result<Vec<User>, RepositoryError>;
    /// Replaces the stored document's fields and returns the saved user.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the stored `_rev` differs from
    /// `user.rev`, i.e. someone else wrote the document after it was loaded.
    async fn update(&self, user: User) -> Result<User, RepositoryError>;
}

#[derive(Clone)]
pub struct UserRepositoryImpl {
    pub db: Database<ReqwestClient>,
}

impl UserRepositoryImpl {
    pub fn new(db: Database<ReqwestClient>) -> Self {
        Self { db }
    }
}

/// The stored document minus `_id`. `_rev` stays so the write is checked against it.
fn update_body(user: &User) -> Result<serde_json::Value, RepositoryError> {
    let mut body = serde_json::to_value(user).map_err(|e| RepositoryError::Database(e.to_string()))?;
    if let Some(fields) = body.as_object_mut() {
        fields.remove("_id");
    }
    Ok(body)
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        let query = arangors::AqlQuery::builder()
            .query("FOR u IN @@collection SORT u.name RETURN u")
            .bind_var("@collection", USERS_COLLECTION)
            .build();

        let users: Vec<User> = self.db.aql_query(query).await?;
        log::debug!("Loaded {} users", users.len());
        Ok(users)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        let id = document_id(id);
        let query = arangors::AqlQuery::builder()
            .query("FOR u IN @@collection FILTER u._id == @id LIMIT 1 RETURN u")
            .bind_var("@collection", USERS_COLLECTION)
            .bind_var("id", id.as_str())
            .build();

        let mut users: Vec<User> = self.db.aql_query(query).await?;
        if users.is_empty() {
            log::info!("User not found by ID: '{}'", id);
        }
        Ok(users.pop())
    }

    async fn find_by_username_or_email(&self, username: &str, email: &str) -> Result<Vec<User>, RepositoryError> {
        let query = arangors::AqlQuery::builder()
            .query("FOR u IN @@collection FILTER u.username == @username OR u.email == @email RETURN u")
            .bind_var("@collection", USERS_COLLECTION)
            .bind_var("username", username)
            .bind_var("email", email)
            .build();

        Ok(self.db.aql_query(query).await?)
    }

    async fn update(&self, user: User) -> Result<User, RepositoryError> {
        let collection = self.db.collection(USERS_COLLECTION).await?;

        let update_options = UpdateOptions::builder()
            .ignore_revs(false)
            .return_new(true)
            .build();

        let key = document_key(&user.id).to_string();
        let response = collection
            .update_document(&key, update_body(&user)?, update_options)
            .await?;

        let saved = response
            .new_doc()
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(user.id.clone()))?;

        serde_json::from_value(saved).map_err(|e| RepositoryError::Database(e.to_string()))
    }
}
