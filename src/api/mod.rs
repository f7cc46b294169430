pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use handlers::ApiDoc;

use crate::{
    auth::AuthService, config::AllowedOrigins, reading_cache::ReadingCache,
    realtime::{ws, SnapshotPublisher},
};

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub cache: ReadingCache,
    pub publisher: SnapshotPublisher,
    /// Browser origins allowed to open the realtime channel.
    pub realtime_origins: AllowedOrigins,
}

pub fn router(state: AppState, cors_origins: &AllowedOrigins) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/user", get(handlers::current_user))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let allow_origin = match origins {
        AllowedOrigins::Any => AllowOrigin::any(),
        AllowedOrigins::List(list) => AllowOrigin::list(list.clone()),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
