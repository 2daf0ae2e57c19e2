/// HTTP mail gateway notifier
///
/// Delivers messages by POSTing JSON to a mail gateway endpoint:
///
/// ```json
/// {
///   "from": "noreply@tasktrack.example",
///   "to": "ops@tasktrack.example",
///   "subject": "User missed task deadline",
///   "body": "User jsmith missed 5 tasks."
/// }
/// ```
///
/// A non-2xx response is treated as a rejected message. The notifier does
/// not retry; the review run records the failure and moves on.
use crate::notify::{Message, Notifier, NotifyError, NotifyResult};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Request timeout for gateway calls
///
/// Short on purpose: the review run should not stall on a slow gateway.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Outgoing gateway payload
#[derive(Debug, Serialize)]
struct GatewayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Notifier that POSTs messages to an HTTP mail gateway
pub struct GatewayNotifier {
    /// HTTP client (connection pooling, rustls)
    client: reqwest::Client,

    /// Gateway endpoint URL
    url: String,

    /// Sender address on outgoing messages
    sender: String,

    /// Operations recipient
    recipient: String,
}

impl GatewayNotifier {
    /// Creates a new gateway notifier
    ///
    /// # Arguments
    ///
    /// * `url` - Gateway endpoint messages are POSTed to
    /// * `sender` - Sender address
    /// * `recipient` - Operations recipient address
    pub fn new(url: String, sender: String, recipient: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            url,
            sender,
            recipient,
        }
    }
}

#[async_trait]
impl Notifier for GatewayNotifier {
    fn name(&self) -> &str {
        "gateway"
    }

    async fn send(&self, message: &Message) -> NotifyResult<()> {
        let payload = GatewayPayload {
            from: &self.sender,
            to: &self.recipient,
            subject: &message.subject,
            body: &message.body,
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected {
                status: response.status().as_u16(),
            });
        }

        tracing::debug!(recipient = %self.recipient, subject = %message.subject, "Sent notification");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_notifier_name() {
        let notifier = GatewayNotifier::new(
            "http://localhost:9000/send".to_string(),
            "noreply@tasktrack.example".to_string(),
            "ops@tasktrack.example".to_string(),
        );
        assert_eq!(notifier.name(), "gateway");
    }

    #[test]
    fn test_payload_serialization() {
        let payload = GatewayPayload {
            from: "noreply@tasktrack.example",
            to: "ops@tasktrack.example",
            subject: "User missed task deadline",
            body: "User jsmith missed 5 tasks.",
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["from"], "noreply@tasktrack.example");
        assert_eq!(json["to"], "ops@tasktrack.example");
        assert_eq!(json["subject"], "User missed task deadline");
        assert_eq!(json["body"], "User jsmith missed 5 tasks.");
    }
}
