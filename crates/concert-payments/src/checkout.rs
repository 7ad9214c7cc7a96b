//! Stripe Checkout Integration
//!
//! Pay-what-you-want virtual tickets sold through Stripe's hosted checkout.
//! The concert slug, name and stream password travel as session metadata so
//! the webhook and the success page can recover them.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionId, CheckoutSessionMode,
    CheckoutSessionPaymentStatus, Client, CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionLineItemsPriceData, CreateCheckoutSessionLineItemsPriceDataProductData,
    CreateCheckoutSessionPaymentMethodTypes, Currency,
};

use crate::error::{PaymentError, Result};

/// Smallest accepted ticket price ($10)
pub const MIN_TICKET_AMOUNT_CENTS: i64 = 1000;

const PRODUCT_DESCRIPTION: &str = "Live stream access for Meadowlark House Concert";

const META_SLUG: &str = "concertSlug";
const META_NAME: &str = "concertName";
const META_PASSWORD: &str = "streamPassword";

/// Virtual ticket order as posted by the ticket page
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketOrder {
    /// Price in cents, chosen by the buyer
    #[serde(default)]
    pub amount: Option<i64>,

    #[serde(default)]
    pub concert_slug: String,

    #[serde(default)]
    pub concert_name: String,

    /// Access code emailed to the buyer after payment
    #[serde(default)]
    pub stream_password: String,
}

impl TicketOrder {
    /// Check the amount against the minimum; returns the amount in cents
    pub fn validate(&self) -> Result<i64> {
        match self.amount {
            Some(amount) if amount >= MIN_TICKET_AMOUNT_CENTS => Ok(amount),
            amount => Err(PaymentError::AmountTooLow { amount }),
        }
    }

    pub fn metadata(&self) -> TicketMetadata {
        TicketMetadata {
            concert_slug: Some(self.concert_slug.clone()),
            concert_name: Some(self.concert_name.clone()),
            stream_password: Some(self.stream_password.clone()),
        }
    }

    /// Line item name shown on the Stripe page
    pub fn product_name(&self) -> String {
        format!("Virtual Ticket: {}", self.concert_name)
    }
}

/// Identifying fields stored on the checkout session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concert_slug: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concert_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_password: Option<String>,
}

impl TicketMetadata {
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        Self {
            concert_slug: map.get(META_SLUG).cloned(),
            concert_name: map.get(META_NAME).cloned(),
            stream_password: map.get(META_PASSWORD).cloned(),
        }
    }

    pub fn into_map(self) -> HashMap<String, String> {
        [
            (META_SLUG, self.concert_slug),
            (META_NAME, self.concert_name),
            (META_PASSWORD, self.stream_password),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect()
    }
}

/// Where Stripe sends the buyer afterwards
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl RedirectUrls {
    /// Success and cancel pages on the site the buyer came from
    pub fn for_origin(origin: &str, concert_slug: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            success_url: format!("{origin}/virtual-ticket-success?session_id={{CHECKOUT_SESSION_ID}}"),
            cancel_url: format!("{origin}/virtual-ticket/{concert_slug}"),
        }
    }
}

/// A newly created hosted checkout session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSession {
    pub session_id: String,

    /// URL to redirect the buyer to
    pub url: String,
}

/// State of an existing checkout session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionLookup {
    pub paid: bool,
    pub metadata: TicketMetadata,
}

/// Payment provider seam
///
/// `StripeClient` is the production implementation.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Create a hosted checkout session for an already validated order
    async fn create_ticket_session(
        &self,
        order: &TicketOrder,
        urls: &RedirectUrls,
    ) -> Result<CreatedSession>;

    /// Look up a checkout session by ID
    async fn retrieve_ticket_session(&self, session_id: &str) -> Result<SessionLookup>;
}

/// Validate an order, then open a checkout session for it.
///
/// The gateway is never called for an order under the minimum.
pub async fn start_ticket_checkout(
    gateway: &dyn CheckoutGateway,
    order: &TicketOrder,
    urls: &RedirectUrls,
) -> Result<CreatedSession> {
    order.validate()?;
    gateway.create_ticket_session(order, urls).await
}

/// Look up a session and require it to be paid
pub async fn paid_ticket_metadata(
    gateway: &dyn CheckoutGateway,
    session_id: &str,
) -> Result<TicketMetadata> {
    let lookup = gateway.retrieve_ticket_session(session_id).await?;
    if !lookup.paid {
        return Err(PaymentError::PaymentIncomplete(session_id.to_string()));
    }
    Ok(lookup.metadata)
}

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,
    webhook_secret: String,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(secret_key: &str, webhook_secret: &str) -> Self {
        Self {
            client: Client::new(secret_key),
            webhook_secret: webhook_secret.to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;
        let webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .map_err(|_| PaymentError::Config("STRIPE_WEBHOOK_SECRET not set".into()))?;

        Ok(Self::new(&secret_key, &webhook_secret))
    }

    /// Get the webhook secret
    pub fn webhook_secret(&self) -> &str {
        &self.webhook_secret
    }
}

#[async_trait]
impl CheckoutGateway for StripeClient {
    async fn create_ticket_session(
        &self,
        order: &TicketOrder,
        urls: &RedirectUrls,
    ) -> Result<CreatedSession> {
        let amount = order.validate()?;

        let mut params = CreateCheckoutSession::new();
        params.success_url = Some(&urls.success_url);
        params.cancel_url = Some(&urls.cancel_url);
        params.mode = Some(CheckoutSessionMode::Payment);
        params.payment_method_types = Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]);
        params.metadata = Some(order.metadata().into_map());

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency: Currency::USD,
                unit_amount: Some(amount),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: order.product_name(),
                    description: Some(PRODUCT_DESCRIPTION.to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Stripe("No checkout URL returned".into()))?;

        tracing::info!(
            session_id = %session.id,
            slug = %order.concert_slug,
            amount,
            "Created virtual ticket checkout"
        );

        Ok(CreatedSession {
            session_id: session.id.to_string(),
            url,
        })
    }

    async fn retrieve_ticket_session(&self, session_id: &str) -> Result<SessionLookup> {
        let id: CheckoutSessionId = session_id
            .parse()
            .map_err(|_| PaymentError::InvalidSessionId(session_id.to_string()))?;

        let session = StripeCheckoutSession::retrieve(&self.client, &id, &[])
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        Ok(SessionLookup {
            paid: session.payment_status == CheckoutSessionPaymentStatus::Paid,
            metadata: session
                .metadata
                .as_ref()
                .map(TicketMetadata::from_map)
                .unwrap_or_default(),
        })
    }
}
