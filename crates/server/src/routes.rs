use std::sync::Arc;

use axum::{routing::get, Json, Router};
use common::types::{Envelope, Health};
use service::user::UserManager;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod users;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserManager>,
}

pub async fn index() -> Json<Envelope<()>> {
    Json(Envelope::success("It's working! 🚀"))
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: index, health and the user API.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/v1/users", get(users::list).post(users::create))
        .route(
            "/api/v1/users/:id",
            get(users::get_one).put(users::update).delete(users::delete),
        );

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
