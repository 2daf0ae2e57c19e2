/// Mock notifier for tests
///
/// Records every message in memory instead of delivering it, and can be
/// switched into a failing mode to exercise the "notification failure
/// never blocks deactivation" path.
///
/// # Example
///
/// ```
/// use tasktrack_reviewer::notify::{Message, MockNotifier, Notifier};
///
/// # async fn example() {
/// let notifier = MockNotifier::new();
/// notifier.send(&Message::missed_deadline("jsmith", 5)).await.unwrap();
///
/// let sent = notifier.sent_messages();
/// assert_eq!(sent.len(), 1);
/// assert!(sent[0].body.contains("jsmith"));
/// # }
/// ```
use crate::notify::{Message, Notifier, NotifyError, NotifyResult};
use async_trait::async_trait;
use std::sync::Mutex;

/// Notifier that records messages in memory
pub struct MockNotifier {
    /// Messages successfully "sent"
    sent: Mutex<Vec<Message>>,

    /// Whether send attempts should fail
    fail: bool,
}

impl MockNotifier {
    /// Creates a mock notifier that accepts every message
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Creates a mock notifier that rejects every message
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Returns a copy of the messages sent so far
    pub fn sent_messages(&self) -> Vec<Message> {
        self.sent.lock().expect("mock notifier lock poisoned").clone()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, message: &Message) -> NotifyResult<()> {
        if self.fail {
            return Err(NotifyError::SendFailed(
                "mock notifier configured to fail".to_string(),
            ));
        }

        self.sent
            .lock()
            .expect("mock notifier lock poisoned")
            .push(message.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_messages() {
        let notifier = MockNotifier::new();

        notifier
            .send(&Message::missed_deadline("alice", 5))
            .await
            .unwrap();
        notifier
            .send(&Message::missed_deadline("bob", 6))
            .await
            .unwrap();

        let sent = notifier.sent_messages();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].body, "User alice missed 5 tasks.");
        assert_eq!(sent[1].body, "User bob missed 6 tasks.");
    }

    #[tokio::test]
    async fn test_failing_mock_records_nothing() {
        let notifier = MockNotifier::failing();

        let result = notifier.send(&Message::missed_deadline("alice", 5)).await;

        assert!(matches!(result, Err(NotifyError::SendFailed(_))));
        assert!(notifier.sent_messages().is_empty());
    }
}
