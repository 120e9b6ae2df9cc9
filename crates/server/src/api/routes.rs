//! API route definitions

use super::{handlers::*, ApiState};
use axum::{
    routing::{get, post},
    Router,
};

/// Token creation routes
pub fn create_token_routes() -> Router<ApiState> {
    Router::new().route("/create-coin", post(create_coin))
}

/// Operational routes
pub fn create_health_routes() -> Router<ApiState> {
    Router::new().route("/health", get(health))
}
