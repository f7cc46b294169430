use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account as stored in the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// bcrypt hash; never leaves the service.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a `User`; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
