pub mod error;
pub mod identity;
pub mod messages;
pub mod participants;
pub mod sanitize;
pub mod state;
pub mod status;
pub mod sweep;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// Every HTTP route of the chat room, with CORS and request tracing applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/participants", post(participants::join).get(participants::list))
        .route("/messages", post(messages::send_message).get(messages::get_messages))
        .route("/messages/{id}", delete(messages::delete_message))
        .route("/status", post(status::heartbeat))
        .route("/health", get(|| async { "ok" }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
