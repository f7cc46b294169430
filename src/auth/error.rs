use thiserror::Error;

use crate::db::{DuplicateField, StoreError};

/// Everything that can go wrong in registration, login or token lookup.
///
/// `Display` is the message shown to the client, so `Internal` deliberately
/// says nothing about its source.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("all fields are required")]
    MissingFields,

    #[error("username already taken")]
    UsernameTaken,

    #[error("email already registered")]
    EmailTaken,

    /// Unknown username and wrong password share this variant.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("authorization required")]
    MissingToken,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("user not found")]
    UserNotFound,

    #[error("internal server error")]
    Internal(#[source] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(DuplicateField::Username) => Self::UsernameTaken,
            StoreError::Duplicate(DuplicateField::Email) => Self::EmailTaken,
            StoreError::Database(e) => Self::Internal(anyhow::Error::new(e)),
        }
    }
}
