//! Meadowlark Concerts HTTP Server
//!
//! Axum-based server for the concert site: virtual ticket checkout, session
//! lookup and the Stripe webhook, plus JSON concert listings.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use concert_payments::{LogOnlyMailer, ResendMailer, StripeClient, TicketMailer, WebhookHandler};

use crate::config::ServerConfig;
use crate::state::{AppState, Payments};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Concert listings
    let concerts = config.source.build()?;
    tracing::info!("✓ Concert source: {}", concerts.name());

    // Payments
    let payments = match StripeClient::from_env() {
        Ok(client) => {
            tracing::info!("✓ Stripe configured");
            let webhook_secret = client.webhook_secret().to_string();
            Some(Payments {
                gateway: Arc::new(client),
                webhook_secret,
            })
        }
        Err(e) => {
            tracing::warn!("⚠ Stripe not configured - payments disabled ({})", e);
            tracing::warn!("  Set STRIPE_SECRET_KEY and STRIPE_WEBHOOK_SECRET in .env");
            None
        }
    };

    // Ticket emails
    let mailer: Arc<dyn TicketMailer> = match ResendMailer::from_env() {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            tracing::warn!("⚠ Email not configured - ticket emails will only be logged ({})", e);
            Arc::new(LogOnlyMailer)
        }
    };
    tracing::info!("✓ Mailer: {}", mailer.name());

    // Build application state
    let state = AppState {
        concerts,
        payments,
        webhooks: Arc::new(WebhookHandler::new(mailer, config.site_url.clone())),
        site_url: config.site_url.clone(),
    };

    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🎻 concert-server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                 - Health check");
    tracing::info!("  POST /api/create-checkout    - Create virtual ticket checkout");
    tracing::info!("  GET  /api/get-session        - Ticket details for a paid session");
    tracing::info!("  POST /api/stripe-webhook     - Stripe webhook");
    tracing::info!("  GET  /api/concerts/upcoming  - Upcoming concerts");
    tracing::info!("  GET  /api/concerts/past      - Past concerts");
    tracing::info!("  GET  /api/concerts/next      - Next concert");
    tracing::info!("  GET  /api/concerts/{{slug}}    - Concert by slug");
    tracing::info!("  GET  /api/venue              - Venue details");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
