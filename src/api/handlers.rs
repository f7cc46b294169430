use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use utoipa::OpenApi;

use super::{
    dto::{AuthResponse, ErrorResponse, LoginRequest, RegisterRequest, UserView},
    errors::AppError,
    AppState,
};
use crate::sensors::models::SensorSnapshot;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Create an account and return a session token for it.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "A field is missing", body = ErrorResponse),
        (status = 409, description = "Username or email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let session = state
        .auth
        .register(
            req.username.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
            req.email.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Exchange username and password for a fresh session token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let session = state
        .auth
        .login(
            req.username.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(session.into()))
}

/// Return the account identified by the `Authorization: Bearer` token.
#[utoipa::path(
    get,
    path = "/user",
    responses(
        (status = 200, description = "Current user", body = UserView),
        (status = 401, description = "Token missing, invalid or expired", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserView>, AppError> {
    let user = state.auth.current_user(bearer_token(&headers)).await?;
    Ok(Json(user.into()))
}

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// Token from an `Authorization: Bearer <token>` header, if well-formed.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(register, login, current_user, health, crate::realtime::ws::ws_handler),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        UserView,
        ErrorResponse,
        SensorSnapshot,
    )),
    tags(
        (name = "auth",     description = "Account registration and sessions"),
        (name = "realtime", description = "Live sensor snapshots over websocket"),
        (name = "system",   description = "System endpoints"),
    ),
    info(
        title = "Agro Station API",
        version = "0.1.0",
        description = "Accounts and live telemetry for a serial-connected field station"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
