//! Axum router configuration with middleware.
//!
//! Routes live under `/v1/`; `/health` sits at the root. Every request is
//! traced with `tower-http`'s `TraceLayer`.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::{ApiState, ChatApi, HealthCheck, MessageApi};

/// Build the complete API router with all routes and middleware.
pub fn build_router<C, M, H>(state: ApiState<C, M, H>) -> Router
where
    C: ChatApi,
    M: MessageApi,
    H: HealthCheck,
{
    let v1 = Router::new()
        .route("/chats/", post(handlers::chat::create_chat::<C, M, H>))
        .route(
            "/chats/{id}",
            get(handlers::chat::get_chat::<C, M, H>).delete(handlers::chat::delete_chat::<C, M, H>),
        )
        .route(
            "/chats/{id}/messages/",
            post(handlers::message::create_message::<C, M, H>),
        );

    Router::new()
        .route("/health", get(handlers::health::health::<C, M, H>))
        .nest("/v1", v1)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
