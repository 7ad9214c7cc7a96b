//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Ticket amount missing or under the minimum
    #[error("Amount {amount:?} is below the 1000 cent minimum")]
    AmountTooLow { amount: Option<i64> },

    /// Checkout session exists but is not paid
    #[error("Checkout session {0} is not paid")]
    PaymentIncomplete(String),

    /// Session ID could not be parsed
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Email API error
    #[error("Email error: {0}")]
    Email(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Whether the caller sent something we reject (4xx) rather than an
    /// upstream failure (5xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PaymentError::AmountTooLow { .. }
                | PaymentError::PaymentIncomplete(_)
                | PaymentError::WebhookSignature(_)
        )
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            PaymentError::AmountTooLow { .. } => "Minimum amount is $10",
            PaymentError::PaymentIncomplete(_) => "Payment not completed",
            PaymentError::WebhookSignature(_) => "Webhook signature verification failed",
            PaymentError::Config(_) => "Service configuration error.",
            _ => "Payment processing failed. Please try again.",
        }
    }
}
