//! Buyer notifications sent after a checkout commits.

use thiserror::Error;

use crate::domain::order::Order;

#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Message telling the buyer their order was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl OrderConfirmation {
    pub const SUBJECT: &'static str = "Your Order Details";

    pub fn for_order(order: &Order, store_name: &str) -> Self {
        let body = format!(
            "Hey {},\n\n\
             We received your order!\n\n\
             Give us some time to process your order and ship it out to you.\n\n\
             You can go on your user dashboard to check the status of your order \
             ({}).\n\n\
             Sincerely,\n{}",
            order.address.full_name, order.transaction_id, store_name
        );

        Self {
            recipient: order.user_email.clone(),
            subject: Self::SUBJECT.to_string(),
            body,
        }
    }
}

/// Delivery channel for order confirmations. Implementations may block; the
/// checkout runs them off the async executor under a timeout.
pub trait Notifier: Send + Sync {
    fn send(&self, message: &OrderConfirmation) -> Result<(), NotifyError>;
}

/// Writes confirmations to the log instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, message: &OrderConfirmation) -> Result<(), NotifyError> {
        if message.recipient.is_empty() {
            return Err(NotifyError("recipient address is empty".to_string()));
        }
        log::info!(
            "Sending '{}' to {} ({} bytes)",
            message.subject,
            message.recipient,
            message.body.len()
        );
        Ok(())
    }
}
