pub mod health;
pub mod stream_token;

use axum::Router;

use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", stream_token::token_routes())
        .merge(health::health_routes())
        .with_state(state)
}
