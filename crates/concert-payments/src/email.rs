//! Ticket Emails
//!
//! Sends the watch-page link and access code to a buyer through the Resend
//! HTTP API.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{PaymentError, Result};
use crate::webhook::TicketPurchase;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Sender used when `EMAIL_FROM` is not set
pub const DEFAULT_FROM: &str = "Meadowlark Concerts <onboarding@resend.dev>";

/// A rendered ticket email
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl TicketEmail {
    /// Build the email for a completed purchase
    pub fn for_purchase(purchase: &TicketPurchase, site_url: &str) -> Self {
        let watch_url = purchase.watch_url(site_url);
        let concert_name = escape_html(&purchase.concert_name);
        let watch_url = escape_html(&watch_url);
        let access_code = escape_html(&purchase.stream_password);

        let html = format!(
            r#"
            <div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
              <h1 style="color: #2d5a3f;">Thank You for Your Support!</h1>

              <p>You're all set to watch <strong>{concert_name}</strong> from wherever you are.</p>

              <div style="background: #f5f5f0; padding: 20px; border-radius: 8px; margin: 24px 0;">
                <h2 style="margin-top: 0; color: #2d5a3f;">How to Watch</h2>
                <p><strong>Watch Page:</strong><br>
                <a href="{watch_url}">{watch_url}</a></p>

                <p><strong>Access Code:</strong><br>
                <code style="background: #fff; padding: 4px 8px; border-radius: 4px; font-size: 18px;">{access_code}</code></p>
              </div>

              <p>The stream will be available on the day of the concert. Visit the watch page and enter your access code when prompted.</p>

              <p>If you have any questions, just reply to this email.</p>

              <p style="color: #666; margin-top: 32px;">
                With gratitude,<br>
                Meadowlark Concerts
              </p>
            </div>
            "#
        );

        Self {
            to: purchase.customer_email.clone(),
            subject: format!("Your Virtual Ticket: {}", purchase.concert_name),
            html,
        }
    }
}

/// Outbound mail seam
#[async_trait]
pub trait TicketMailer: Send + Sync {
    async fn send(&self, email: &TicketEmail) -> Result<()>;

    /// Mailer name for logs
    fn name(&self) -> &str;
}

#[derive(Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Resend transactional email client
pub struct ResendMailer {
    api_key: String,
    from: String,
    client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            from: from.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create from `RESEND_API_KEY` and optional `EMAIL_FROM`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("RESEND_API_KEY")
            .map_err(|_| PaymentError::Config("RESEND_API_KEY not set".into()))?;
        let from = std::env::var("EMAIL_FROM").unwrap_or_else(|_| DEFAULT_FROM.into());

        Ok(Self::new(api_key, from))
    }
}

#[async_trait]
impl TicketMailer for ResendMailer {
    async fn send(&self, email: &TicketEmail) -> Result<()> {
        let payload = ResendPayload {
            from: &self.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PaymentError::Email(format!("Failed to send email request: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_else(|_| "(no body)".to_string());
            Err(PaymentError::Email(format!("Resend API error: {status} - {text}")))
        }
    }

    fn name(&self) -> &str {
        "resend"
    }
}

/// Logs emails instead of sending them (no API key configured)
#[derive(Clone, Copy, Debug, Default)]
pub struct LogOnlyMailer;

#[async_trait]
impl TicketMailer for LogOnlyMailer {
    async fn send(&self, email: &TicketEmail) -> Result<()> {
        tracing::warn!(
            to = %email.to,
            subject = %email.subject,
            "Email delivery disabled; not sending"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log-only"
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
