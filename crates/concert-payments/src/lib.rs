//! # concert-payments
//!
//! Virtual tickets for live-streamed concerts.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌──────────────────┐
//! │ Ticket page │────▶│  Stripe Hosted  │────▶│  Success page    │
//! │ (amount)    │     │  Checkout Page  │     │  (get-session)   │
//! └─────────────┘     └─────────────────┘     └──────────────────┘
//!                              │
//!                              ▼ checkout.session.completed
//!                     ┌─────────────────┐     ┌──────────────────┐
//!                     │ Webhook handler │────▶│ Resend: watch URL│
//!                     │ (verify + parse)│     │ + access code    │
//!                     └─────────────────┘     └──────────────────┘
//! ```
//!
//! The concert slug, name and stream password ride along as checkout
//! session metadata; nothing is stored on our side.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use concert_payments::{RedirectUrls, StripeClient, TicketOrder, start_ticket_checkout};
//!
//! let client = StripeClient::new("sk_test_xxx", "whsec_xxx");
//!
//! let session = start_ticket_checkout(
//!     &client,
//!     &order,
//!     &RedirectUrls::for_origin("https://meadowlarkconcerts.com", &order.concert_slug),
//! ).await?;
//!
//! // Redirect buyer to: session.url
//! ```

mod checkout;
mod email;
mod error;
mod webhook;

pub use checkout::{
    CheckoutGateway, CreatedSession, MIN_TICKET_AMOUNT_CENTS, RedirectUrls, SessionLookup,
    StripeClient, TicketMetadata, TicketOrder, paid_ticket_metadata, start_ticket_checkout,
};
pub use email::{DEFAULT_FROM, LogOnlyMailer, ResendMailer, TicketEmail, TicketMailer};
pub use error::{PaymentError, Result};
pub use webhook::{TicketPurchase, WebhookHandler, WebhookOutcome, ticket_purchase};
