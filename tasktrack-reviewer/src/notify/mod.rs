/// Notification sending
///
/// The reviewer notifies a fixed operations recipient when a user crosses
/// the missed-task threshold. Delivery is best-effort and fire-and-forget:
/// a failed send is logged and reported but never blocks deactivation.
///
/// # Notifier Contract
///
/// All notifiers implement the [`Notifier`] trait (async):
/// 1. Accept a [`Message`] (subject + body)
/// 2. Deliver it to the configured recipient, or fail with a
///    [`NotifyError`]
/// 3. Never retry internally; the caller treats a failure as final for
///    the run
///
/// # Implementations
///
/// - `gateway`: POSTs messages to an HTTP mail gateway
/// - `mock`: records messages in memory for tests
use async_trait::async_trait;

pub mod gateway;
pub mod mock;

pub use gateway::GatewayNotifier;
pub use mock::MockNotifier;

/// Notification error types
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Request to the gateway failed (connection, timeout, DNS)
    #[error("Failed to reach notification gateway: {0}")]
    Transport(#[from] reqwest::Error),

    /// Gateway answered with a non-success status
    #[error("Notification gateway rejected the message: HTTP {status}")]
    Rejected { status: u16 },

    /// Simulated failure (mock notifier)
    #[error("Notification send failed: {0}")]
    SendFailed(String),
}

/// Notification result type alias
pub type NotifyResult<T> = Result<T, NotifyError>;

/// A message to be delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Subject line
    pub subject: String,

    /// Plain-text body
    pub body: String,
}

impl Message {
    /// Builds the overdue-tasks notification for one user
    ///
    /// # Example
    ///
    /// ```
    /// use tasktrack_reviewer::notify::Message;
    ///
    /// let msg = Message::missed_deadline("jsmith", 5);
    /// assert_eq!(msg.subject, "User missed task deadline");
    /// assert!(msg.body.contains("jsmith"));
    /// assert!(msg.body.contains("5"));
    /// ```
    pub fn missed_deadline(username: &str, missed_count: i64) -> Self {
        Self {
            subject: "User missed task deadline".to_string(),
            body: format!("User {} missed {} tasks.", username, missed_count),
        }
    }
}

/// Notification sender
///
/// Implementations deliver a [`Message`] to the operations recipient they
/// were configured with.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notifier name for logging
    fn name(&self) -> &str;

    /// Sends a message
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] if delivery fails. The caller logs and
    /// reports the failure; it is never fatal to the review run.
    async fn send(&self, message: &Message) -> NotifyResult<()>;
}
