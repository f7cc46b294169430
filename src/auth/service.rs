use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};

use super::{error::AuthError, password, token::TokenIssuer};
use crate::db::{
    models::{NewUser, User},
    UserStore,
};

/// A freshly issued token together with the account it belongs to.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Registration, login and token-to-user resolution.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
    /// Verified against when the username is unknown so that both login
    /// failures take the same time.
    dummy_hash: Arc<str>,
}

impl AuthService {
    pub async fn new(
        store: Arc<dyn UserStore>,
        tokens: TokenIssuer,
        bcrypt_cost: u32,
    ) -> anyhow::Result<Self> {
        let dummy_hash = password::hash("dummy-never-matches".to_owned(), bcrypt_cost)
            .await
            .context("failed to prepare dummy password hash")?;

        Ok(Self {
            store,
            tokens,
            bcrypt_cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Create an account and log it in.
    ///
    /// A username clash is reported in preference to an email clash.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<AuthSession, AuthError> {
        if username.is_empty() || password.is_empty() || email.is_empty() {
            return Err(AuthError::MissingFields);
        }

        if let Some(existing) = self.store.find_by_username_or_email(username, email).await? {
            debug!(username = %username, "Registration rejected: account exists");
            return Err(if existing.username == username {
                AuthError::UsernameTaken
            } else {
                AuthError::EmailTaken
            });
        }

        let password_hash = password::hash(password.to_owned(), self.bcrypt_cost)
            .await
            .map_err(AuthError::Internal)?;

        // The unique keys still guard against a concurrent registration that
        // slipped past the lookup above.
        let user = self
            .store
            .insert(NewUser {
                username: username.to_owned(),
                email: email.to_owned(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        self.session_for(user)
    }

    /// Check credentials and issue a fresh token.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let Some(user) = self.store.find_by_username(username).await? else {
            // Burn the same time a real comparison would; the result is irrelevant.
            let _ = password::verify(password.to_owned(), self.dummy_hash.to_string()).await;
            debug!(username = %username, "Login rejected: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        let matches = password::verify(password.to_owned(), user.password_hash.clone())
            .await
            .map_err(AuthError::Internal)?;
        if !matches {
            debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");
        self.session_for(user)
    }

    /// Resolve a bearer token to its account.
    pub async fn current_user(&self, token: Option<&str>) -> Result<User, AuthError> {
        let token = token.ok_or(AuthError::MissingToken)?;
        let claims = self.tokens.verify(token).map_err(|e| {
            debug!(error = %e, "Token rejected");
            AuthError::InvalidToken
        })?;

        self.store
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    fn session_for(&self, user: User) -> Result<AuthSession, AuthError> {
        let token = self
            .tokens
            .issue(user.id)
            .context("failed to sign session token")
            .map_err(AuthError::Internal)?;
        Ok(AuthSession { token, user })
    }
}
