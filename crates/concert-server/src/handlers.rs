//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use concert_data::{Concert, ConcertRepository, VENUE, Venue};
use concert_payments::{
    CreatedSession, PaymentError, RedirectUrls, TicketMetadata, TicketOrder, paid_ticket_metadata,
    start_ticket_checkout,
};

use crate::state::{AppState, Payments};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stripe_configured: bool,
    pub concert_source: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// A concert plus its long-form date for display
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcertListing {
    #[serde(flatten)]
    pub concert: Concert,
    pub display_date: String,
}

impl From<&Concert> for ConcertListing {
    fn from(concert: &Concert) -> Self {
        Self {
            display_date: concert.display_date(),
            concert: concert.clone(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: error.into() }))
}

fn payments_disabled() -> ApiError {
    api_error(StatusCode::SERVICE_UNAVAILABLE, "Payments not configured")
}

fn payments(state: &AppState) -> Result<&Payments, ApiError> {
    state.payments.as_ref().ok_or_else(payments_disabled)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        stripe_configured: state.payments.is_some(),
        concert_source: state.concerts.name().to_string(),
    })
}

/// Answer for a known path hit with the wrong method
pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Create a virtual ticket checkout session
pub async fn create_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<CreatedSession>, ApiError> {
    let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
    let order: TicketOrder = serde_json::from_str(body).map_err(|e| {
        tracing::warn!("Invalid checkout body: {}", e);
        api_error(StatusCode::BAD_REQUEST, "Invalid request body")
    })?;

    // Reject small amounts before touching the provider
    order
        .validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.user_message()))?;

    let payments = payments(&state)?;

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(&state.site_url);
    let urls = RedirectUrls::for_origin(origin, &order.concert_slug);

    let session = start_ticket_checkout(payments.gateway.as_ref(), &order, &urls)
        .await
        .map_err(|e| {
            tracing::error!("Checkout error: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create checkout session")
        })?;

    Ok(Json(session))
}

/// Return ticket details for a paid checkout session
pub async fn get_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<TicketMetadata>, ApiError> {
    let session_id = query
        .session_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing session_id"))?;

    let payments = payments(&state)?;

    let metadata = paid_ticket_metadata(payments.gateway.as_ref(), &session_id)
        .await
        .map_err(|e| match e {
            PaymentError::PaymentIncomplete(_) => {
                api_error(StatusCode::BAD_REQUEST, e.user_message())
            }
            e => {
                tracing::error!("Get session error: {}", e);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve session")
            }
        })?;

    Ok(Json(metadata))
}

/// Stripe webhook handler
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookAck>, ApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing stripe-signature header"))?;

    let payments = payments(&state)?;

    let event = state
        .webhooks
        .parse_event(&body, signature, &payments.webhook_secret)
        .map_err(|e| {
            tracing::warn!("Webhook signature verification failed: {}", e);
            api_error(StatusCode::BAD_REQUEST, "Webhook signature verification failed")
        })?;

    // Email failures are logged inside and never fail the webhook
    state.webhooks.handle(event).await;

    Ok(Json(WebhookAck { received: true }))
}

async fn load_repository(state: &AppState) -> Result<ConcertRepository, ApiError> {
    ConcertRepository::load_from(state.concerts.as_ref())
        .await
        .map_err(|e| {
            tracing::error!(source = state.concerts.name(), "Concert load error: {}", e);
            api_error(StatusCode::BAD_GATEWAY, "Failed to load concerts")
        })
}

fn listings(concerts: &[&Concert]) -> Vec<ConcertListing> {
    concerts.iter().map(|c| ConcertListing::from(*c)).collect()
}

/// Upcoming concerts, earliest first
pub async fn upcoming_concerts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ConcertListing>>, ApiError> {
    let repo = load_repository(&state).await?;
    Ok(Json(listings(&repo.upcoming())))
}

/// Past concerts, most recent first
pub async fn past_concerts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ConcertListing>>, ApiError> {
    let repo = load_repository(&state).await?;
    Ok(Json(listings(&repo.past())))
}

/// The next upcoming concert
pub async fn next_concert(State(state): State<AppState>) -> Result<Json<ConcertListing>, ApiError> {
    let repo = load_repository(&state).await?;
    repo.next()
        .map(|c| Json(ConcertListing::from(c)))
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "No upcoming concerts"))
}

/// A single concert by slug
pub async fn concert_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ConcertListing>, ApiError> {
    let repo = load_repository(&state).await?;
    repo.by_slug(&slug)
        .map(|c| Json(ConcertListing::from(c)))
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Concert not found"))
}

/// Venue details
pub async fn venue() -> Json<Venue> {
    Json(VENUE)
}
