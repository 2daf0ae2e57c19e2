/// Configuration management for the overdue reviewer
///
/// Loads configuration from environment variables. The threshold, sender,
/// and recipient are deliberately configuration values, not literals: the
/// policy knob and the addresses belong to the operator.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `MISSED_TASK_THRESHOLD`: Missed-task count that triggers
///   notification and deactivation (default: 5)
/// - `NOTIFY_GATEWAY_URL`: Mail gateway endpoint messages are POSTed to
///   (required)
/// - `NOTIFY_SENDER`: Sender address on outgoing messages (required)
/// - `NOTIFY_RECIPIENT`: Operations recipient for overdue notifications
///   (required)
///
/// # Example
///
/// ```no_run
/// use tasktrack_reviewer::config::ReviewerConfig;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = ReviewerConfig::from_env()?;
/// println!("Threshold: {}", config.threshold);
/// # Ok(())
/// # }
/// ```
use std::env;

/// Reviewer configuration
#[derive(Debug, Clone)]
pub struct ReviewerConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Missed-task count at which a user is notified about and
    /// deactivated (inclusive: `missed_count >= threshold` triggers)
    pub threshold: i64,

    /// Mail gateway endpoint
    pub gateway_url: String,

    /// Sender address on outgoing messages
    pub sender: String,

    /// Operations recipient for overdue notifications
    pub recipient: String,
}

impl ReviewerConfig {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing, or if the
    /// threshold is not a positive integer.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let threshold = env::var("MISSED_TASK_THRESHOLD")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<i64>()?;

        if threshold < 1 {
            anyhow::bail!("MISSED_TASK_THRESHOLD must be at least 1");
        }

        let gateway_url = env::var("NOTIFY_GATEWAY_URL")
            .map_err(|_| anyhow::anyhow!("NOTIFY_GATEWAY_URL environment variable is required"))?;

        let sender = env::var("NOTIFY_SENDER")
            .map_err(|_| anyhow::anyhow!("NOTIFY_SENDER environment variable is required"))?;

        let recipient = env::var("NOTIFY_RECIPIENT")
            .map_err(|_| anyhow::anyhow!("NOTIFY_RECIPIENT environment variable is required"))?;

        Ok(Self {
            database_url,
            threshold,
            gateway_url,
            sender,
            recipient,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_fields() {
        let config = ReviewerConfig {
            database_url: "postgresql://localhost/test".to_string(),
            threshold: 5,
            gateway_url: "http://localhost:9000/send".to_string(),
            sender: "noreply@tasktrack.example".to_string(),
            recipient: "ops@tasktrack.example".to_string(),
        };

        assert_eq!(config.threshold, 5);
        assert_eq!(config.recipient, "ops@tasktrack.example");
    }
}
