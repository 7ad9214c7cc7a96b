//! Router

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    concert_by_slug, create_checkout, get_session, health_check, method_not_allowed, next_concert,
    past_concerts, stripe_webhook, upcoming_concerts, venue,
};
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))

        // Payments
        .route("/api/create-checkout", post(create_checkout).fallback(method_not_allowed))
        .route("/api/get-session", get(get_session).fallback(method_not_allowed))
        .route("/api/stripe-webhook", post(stripe_webhook).fallback(method_not_allowed))

        // Concert listings
        .route("/api/concerts/upcoming", get(upcoming_concerts))
        .route("/api/concerts/past", get(past_concerts))
        .route("/api/concerts/next", get(next_concert))
        .route("/api/concerts/{slug}", get(concert_by_slug))
        .route("/api/venue", get(venue))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
