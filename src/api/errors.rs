use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use super::dto::ErrorResponse;
use crate::auth::AuthError;

/// Error returned by every handler; rendered as `{"message": "..."}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal server error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(ref source) = self {
            error!(error = ?source, "Request failed with internal error");
        }

        let status = self.status();
        let body = Json(ErrorResponse {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        let message = e.to_string();
        match e {
            AuthError::MissingFields => Self::Validation(message),
            AuthError::UsernameTaken | AuthError::EmailTaken => Self::Conflict(message),
            AuthError::InvalidCredentials | AuthError::MissingToken | AuthError::InvalidToken => {
                Self::Unauthorized(message)
            }
            AuthError::UserNotFound => Self::NotFound(message),
            AuthError::Internal(source) => Self::Internal(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_expected_statuses() {
        let cases = [
            (AuthError::MissingFields, StatusCode::BAD_REQUEST),
            (AuthError::UsernameTaken, StatusCode::CONFLICT),
            (AuthError::EmailTaken, StatusCode::CONFLICT),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::MissingToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AuthError::UserNotFound, StatusCode::NOT_FOUND),
            (
                AuthError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (auth_error, status) in cases {
            assert_eq!(AppError::from(auth_error).status(), status);
        }
    }

    #[test]
    fn internal_error_hides_its_source() {
        let err = AppError::from(AuthError::Internal(anyhow::anyhow!(
            "connection refused to db.internal:5432"
        )));
        assert_eq!(err.to_string(), "internal server error");
    }
}
