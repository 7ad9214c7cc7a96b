//! Stripe Webhook Handling
//!
//! Verifies incoming Stripe events and emails the access code once a virtual
//! ticket checkout completes. A failed email never fails the webhook: the
//! payment has already gone through.

use std::collections::HashMap;
use std::sync::Arc;

use stripe::{CheckoutSession, Event, EventObject, EventType, Webhook};

use crate::email::{TicketEmail, TicketMailer};
use crate::error::{PaymentError, Result};

/// A paid virtual ticket, ready to be fulfilled
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketPurchase {
    pub customer_email: String,
    pub concert_slug: String,
    pub concert_name: String,
    pub stream_password: String,
}

impl TicketPurchase {
    /// Assemble a purchase from a session's customer email and metadata.
    ///
    /// Email, slug and stream password must all be present and non-empty.
    pub fn from_parts(
        customer_email: Option<&str>,
        metadata: Option<&HashMap<String, String>>,
    ) -> Option<Self> {
        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(String::from);

        let metadata = metadata?;
        let field = |key: &str| metadata.get(key).map(String::as_str);

        Some(Self {
            customer_email: non_empty(customer_email)?,
            concert_slug: non_empty(field("concertSlug"))?,
            concert_name: field("concertName").unwrap_or_default().to_string(),
            stream_password: non_empty(field("streamPassword"))?,
        })
    }

    /// Watch page for this concert, e.g. `https://site/watch/<slug>`
    pub fn watch_url(&self, site_url: &str) -> String {
        format!("{}/watch/{}", site_url.trim_end_matches('/'), self.concert_slug)
    }
}

/// Outcome of processing a webhook event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Ticket email sent
    TicketEmailed { email: String, concert_slug: String },

    /// Ticket email could not be sent; logged and absorbed
    EmailFailed { email: String, reason: String },

    /// Event needs no action
    Ignored { event_type: String },
}

/// Webhook handler
pub struct WebhookHandler {
    mailer: Arc<dyn TicketMailer>,
    site_url: String,
}

impl WebhookHandler {
    pub fn new(mailer: Arc<dyn TicketMailer>, site_url: impl Into<String>) -> Self {
        Self {
            mailer,
            site_url: site_url.into(),
        }
    }

    /// Verify webhook signature and parse event
    pub fn parse_event(&self, payload: &str, signature: &str, secret: &str) -> Result<Event> {
        Webhook::construct_event(payload, signature, secret)
            .map_err(|e| PaymentError::WebhookSignature(e.to_string()))
    }

    /// Process a verified event
    pub async fn handle(&self, event: Event) -> WebhookOutcome {
        tracing::info!(event_type = ?event.type_, "Processing Stripe webhook");

        match ticket_purchase(&event) {
            Some(purchase) => self.fulfil(&purchase).await,
            None => {
                let event_type = format!("{:?}", event.type_);
                tracing::debug!(event_type = %event_type, "No ticket to fulfil");
                WebhookOutcome::Ignored { event_type }
            }
        }
    }

    /// Email the access code for a purchase
    pub async fn fulfil(&self, purchase: &TicketPurchase) -> WebhookOutcome {
        let email = TicketEmail::for_purchase(purchase, &self.site_url);

        match self.mailer.send(&email).await {
            Ok(()) => {
                tracing::info!(
                    email = %purchase.customer_email,
                    concert = %purchase.concert_name,
                    mailer = self.mailer.name(),
                    "Sent virtual ticket email"
                );
                WebhookOutcome::TicketEmailed {
                    email: purchase.customer_email.clone(),
                    concert_slug: purchase.concert_slug.clone(),
                }
            }
            Err(e) => {
                tracing::error!(
                    email = %purchase.customer_email,
                    error = %e,
                    "Failed to send virtual ticket email"
                );
                WebhookOutcome::EmailFailed {
                    email: purchase.customer_email.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Extract a ticket purchase from a `checkout.session.completed` event
pub fn ticket_purchase(event: &Event) -> Option<TicketPurchase> {
    if !matches!(event.type_, EventType::CheckoutSessionCompleted) {
        return None;
    }

    let EventObject::CheckoutSession(session) = &event.data.object else {
        tracing::warn!("Checkout completed event without a session object");
        return None;
    };

    let purchase = TicketPurchase::from_parts(customer_email(session), session.metadata.as_ref());
    if purchase.is_none() {
        tracing::warn!(
            session_id = %session.id,
            "Completed session missing email or ticket metadata"
        );
    }
    purchase
}

fn customer_email(session: &CheckoutSession) -> Option<&str> {
    session
        .customer_details
        .as_ref()
        .and_then(|d| d.email.as_deref())
        .or(session.customer_email.as_deref())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use hmac::{Hmac, Mac};
    use serde_json::{Value, json};
    use sha2::Sha256;

    use super::*;

    /// Captures sent emails, optionally failing every send
    #[derive(Default)]
    struct CapturingMailer {
        fail: bool,
        sent: Mutex<Vec<TicketEmail>>,
    }

    #[async_trait::async_trait]
    impl TicketMailer for CapturingMailer {
        async fn send(&self, email: &TicketEmail) -> Result<()> {
            if self.fail {
                return Err(PaymentError::Email("provider down".into()));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "capturing"
        }
    }

    fn metadata() -> HashMap<String, String> {
        HashMap::from([
            ("concertSlug".to_string(), "a".to_string()),
            ("concertName".to_string(), "A Band".to_string()),
            ("streamPassword".to_string(), "tunes".to_string()),
        ])
    }

    fn purchase() -> TicketPurchase {
        TicketPurchase::from_parts(Some("fan@example.com"), Some(&metadata())).unwrap()
    }

    fn quiet_handler() -> WebhookHandler {
        WebhookHandler::new(Arc::new(CapturingMailer::default()), "https://example.com")
    }

    fn sign(payload: &str, secret: &str) -> String {
        let timestamp = chrono::Utc::now().timestamp();
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{timestamp}.{payload}").as_bytes());
        format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    /// A checkout session as Stripe sends it, trimmed to the fields we rely on
    fn checkout_session(details_email: Option<&str>, customer_email: Option<&str>) -> Value {
        let customer_details = details_email.map(|email| {
            json!({
                "address": null,
                "email": email,
                "name": "Fan",
                "phone": null,
                "tax_exempt": "none",
                "tax_ids": []
            })
        });

        json!({
            "id": "cs_test_a1b2c3",
            "object": "checkout.session",
            "amount_total": 2500,
            "automatic_tax": {"enabled": false, "liability": null, "status": null},
            "created": 1_737_936_000,
            "currency": "usd",
            "custom_fields": [],
            "custom_text": {
                "after_submit": null,
                "shipping_address": null,
                "submit": null,
                "terms_of_service_acceptance": null
            },
            "customer_details": customer_details,
            "customer_email": customer_email,
            "expires_at": 1_738_022_400,
            "livemode": false,
            "metadata": metadata(),
            "mode": "payment",
            "payment_method_types": ["card"],
            "payment_status": "paid",
            "shipping_options": [],
            "status": "complete",
            "success_url": "https://meadowlarkconcerts.com/virtual-ticket-success"
        })
    }

    fn event_payload(event_type: &str, session: Value) -> String {
        json!({
            "id": "evt_1QmTestEvent",
            "object": "event",
            "api_version": "2025-01-27.acacia",
            "created": 1_737_936_100,
            "data": {"object": session},
            "livemode": false,
            "pending_webhooks": 1,
            "request": null,
            "type": event_type
        })
        .to_string()
    }

    fn signed_event(handler: &WebhookHandler, payload: &str) -> Event {
        let signature = sign(payload, "whsec_ours");
        handler.parse_event(payload, &signature, "whsec_ours").unwrap()
    }

    fn emailed_to(handler: &WebhookHandler, session: Value) -> Option<String> {
        let payload = event_payload("checkout.session.completed", session);
        ticket_purchase(&signed_event(handler, &payload)).map(|p| p.customer_email)
    }

    #[test]
    fn test_purchase_requires_email_slug_and_password() {
        assert_eq!(purchase().concert_name, "A Band");
        assert!(TicketPurchase::from_parts(None, Some(&metadata())).is_none());
        assert!(TicketPurchase::from_parts(Some(""), Some(&metadata())).is_none());
        assert!(TicketPurchase::from_parts(Some("fan@example.com"), None).is_none());

        let mut no_password = metadata();
        no_password.remove("streamPassword");
        assert!(TicketPurchase::from_parts(Some("fan@example.com"), Some(&no_password)).is_none());

        let mut no_name = metadata();
        no_name.remove("concertName");
        let p = TicketPurchase::from_parts(Some("fan@example.com"), Some(&no_name)).unwrap();
        assert_eq!(p.concert_name, "");
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            purchase().watch_url("https://meadowlarkconcerts.com/"),
            "https://meadowlarkconcerts.com/watch/a"
        );
    }

    #[tokio::test]
    async fn test_fulfil_sends_email() {
        let mailer = Arc::new(CapturingMailer::default());
        let handler = WebhookHandler::new(mailer.clone(), "https://meadowlarkconcerts.com");

        let outcome = handler.fulfil(&purchase()).await;
        assert_eq!(
            outcome,
            WebhookOutcome::TicketEmailed {
                email: "fan@example.com".into(),
                concert_slug: "a".into()
            }
        );

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].html.contains("https://meadowlarkconcerts.com/watch/a"));
        assert!(sent[0].html.contains("tunes"));
    }

    #[tokio::test]
    async fn test_email_failure_is_absorbed() {
        let mailer = Arc::new(CapturingMailer { fail: true, ..Default::default() });
        let handler = WebhookHandler::new(mailer, "https://meadowlarkconcerts.com");

        let outcome = handler.fulfil(&purchase()).await;
        assert!(matches!(outcome, WebhookOutcome::EmailFailed { .. }));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let handler = quiet_handler();
        let payload = r#"{"id":"evt_1","type":"checkout.session.completed"}"#;
        let signature = sign(payload, "whsec_someone_else");

        let err = handler.parse_event(payload, &signature, "whsec_ours").unwrap_err();
        assert!(matches!(err, PaymentError::WebhookSignature(_)));
    }

    #[test]
    fn test_signed_checkout_event_yields_purchase() {
        let handler = quiet_handler();
        let payload = event_payload(
            "checkout.session.completed",
            checkout_session(Some("fan@example.com"), None),
        );

        let event = signed_event(&handler, &payload);
        assert_eq!(event.type_, EventType::CheckoutSessionCompleted);
        assert_eq!(ticket_purchase(&event), Some(purchase()));
    }

    #[test]
    fn test_customer_email_fallback() {
        let handler = quiet_handler();

        assert_eq!(
            emailed_to(&handler, checkout_session(None, Some("fan@example.com"))),
            Some("fan@example.com".into())
        );

        // Customer details win over the prefilled email
        assert_eq!(
            emailed_to(
                &handler,
                checkout_session(Some("paid@example.com"), Some("typed@example.com"))
            ),
            Some("paid@example.com".into())
        );

        assert_eq!(emailed_to(&handler, checkout_session(None, None)), None);
    }

    #[tokio::test]
    async fn test_completed_checkout_is_emailed() {
        let mailer = Arc::new(CapturingMailer::default());
        let handler = WebhookHandler::new(mailer.clone(), "https://meadowlarkconcerts.com");
        let payload = event_payload(
            "checkout.session.completed",
            checkout_session(Some("fan@example.com"), None),
        );

        let outcome = handler.handle(signed_event(&handler, &payload)).await;
        assert_eq!(
            outcome,
            WebhookOutcome::TicketEmailed {
                email: "fan@example.com".into(),
                concert_slug: "a".into()
            }
        );

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "fan@example.com");
    }

    #[tokio::test]
    async fn test_other_events_ignored() {
        let mailer = Arc::new(CapturingMailer::default());
        let handler = WebhookHandler::new(mailer.clone(), "https://meadowlarkconcerts.com");
        let payload = event_payload(
            "checkout.session.expired",
            checkout_session(Some("fan@example.com"), None),
        );

        let outcome = handler.handle(signed_event(&handler, &payload)).await;
        assert!(matches!(outcome, WebhookOutcome::Ignored { .. }));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_signature_rejected() {
        let handler = quiet_handler();
        let err = handler.parse_event("{}", "not-a-signature", "whsec_ours").unwrap_err();
        assert!(matches!(err, PaymentError::WebhookSignature(_)));
    }
}
