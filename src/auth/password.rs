//! bcrypt hashing, run off the async workers since each call costs
//! hundreds of milliseconds at the default cost.

use anyhow::{Context, Result};
use tokio::task;

pub async fn hash(password: String, cost: u32) -> Result<String> {
    task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task failed")?
        .context("password hashing failed")
}

/// `Ok(false)` on mismatch; `Err` only if `hash` is not a usable bcrypt hash.
pub async fn verify(password: String, hash: String) -> Result<bool> {
    task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task failed")?
        .context("stored password hash is malformed")
}
