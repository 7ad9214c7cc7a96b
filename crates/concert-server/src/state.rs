//! Application State

use std::sync::Arc;

use concert_data::ConcertSource;
use concert_payments::{CheckoutGateway, WebhookHandler};

/// Stripe-backed pieces, present only when Stripe is configured
#[derive(Clone)]
pub struct Payments {
    pub gateway: Arc<dyn CheckoutGateway>,
    pub webhook_secret: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Where concert listings come from
    pub concerts: Arc<dyn ConcertSource>,

    /// Stripe client (optional - None if not configured)
    pub payments: Option<Payments>,

    /// Webhook fulfilment (emails the access code)
    pub webhooks: Arc<WebhookHandler>,

    /// Public site URL, fallback origin for checkout redirects
    pub site_url: String,
}
