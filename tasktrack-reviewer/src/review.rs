/// Overdue task review
///
/// One review run evaluates every active regular user against the
/// missed-task threshold and, for each user at or over it, sends one
/// notification and deactivates the account.
///
/// # Architecture
///
/// ```text
/// OverdueReviewer::run()
///   ├─> User::list_active_with_role       # candidates (fatal on error)
///   └─> per candidate:
///         ├─> Task::count_overdue_assigned  # missed_count at fixed `now`
///         ├─> threshold check (>=)
///         ├─> Notifier::send                # best-effort, never blocks
///         └─> User::deactivate              # the authoritative change
/// ```
///
/// # Run semantics
///
/// - `now` is fixed once per run; every overdue comparison in the run
///   uses the same instant.
/// - Candidates are ordered by id so runs are deterministic.
/// - One threshold, one comparison: `missed_count >= threshold` triggers
///   both the notification and the deactivation.
/// - A per-user failure (counting or persisting) is recorded in the
///   report and the batch continues. Only a failure to load the
///   candidate list aborts the run, before any side effects.
/// - Deactivation is one-way with respect to this job: inactive users
///   are not candidates, so a second run over unchanged data selects a
///   strict subset of the first.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasktrack_reviewer::notify::MockNotifier;
/// use tasktrack_reviewer::review::OverdueReviewer;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let notifier = Arc::new(MockNotifier::new());
/// let reviewer = OverdueReviewer::new(pool, notifier);
///
/// let report = reviewer.run().await?;
/// println!("Deactivated {} users", report.deactivated.len());
/// # Ok(())
/// # }
/// ```
use crate::notify::{Message, Notifier};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tasktrack_shared::models::{
    task::Task,
    user::{Role, User},
};
use uuid::Uuid;

/// Default missed-task threshold
pub const DEFAULT_THRESHOLD: i64 = 5;

/// Review run error
///
/// Only run-level failures surface here; per-user failures are carried in
/// the [`ReviewReport`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// Loading the candidate user set failed; the run is aborted before
    /// any side effects
    #[error("Failed to load review candidates: {0}")]
    CandidateLoad(#[source] sqlx::Error),
}

/// Which step of a user's evaluation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Counting the user's overdue tasks
    CountTasks,

    /// Sending the notification (best-effort; deactivation still runs)
    Notify,

    /// Persisting the deactivation
    Deactivate,
}

impl FailureStage {
    /// Stage name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::CountTasks => "count_tasks",
            FailureStage::Notify => "notify",
            FailureStage::Deactivate => "deactivate",
        }
    }
}

/// A user-scoped failure recorded during a run
#[derive(Debug, Clone)]
pub struct UserFailure {
    /// Affected user
    pub user_id: Uuid,

    /// Username for the report
    pub username: String,

    /// Step that failed
    pub stage: FailureStage,

    /// Error description
    pub error: String,
}

/// A deactivation performed during a run
#[derive(Debug, Clone)]
pub struct Deactivation {
    /// Deactivated user
    pub user_id: Uuid,

    /// Username for the report
    pub username: String,

    /// Missed-task count that triggered the deactivation
    pub missed_count: i64,
}

/// Outcome of one review run
///
/// Recomputed fresh every run; nothing here is persisted.
#[derive(Debug, Default)]
pub struct ReviewReport {
    /// Reference time the run classified deadlines against
    pub reference_time: Option<DateTime<Utc>>,

    /// Number of candidates evaluated
    pub evaluated: usize,

    /// Number of notifications successfully sent
    pub notified: usize,

    /// Users deactivated this run
    pub deactivated: Vec<Deactivation>,

    /// User-scoped failures (the run continued past each)
    pub failures: Vec<UserFailure>,
}

impl ReviewReport {
    /// Whether any user-scoped failure occurred
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// The overdue review job
///
/// Holds the database pool, the notification seam, and the threshold.
/// One instance performs one logical pass per [`run`](Self::run) call;
/// scheduling is the caller's concern.
pub struct OverdueReviewer {
    /// Database connection pool
    db: PgPool,

    /// Notification sender (best-effort)
    notifier: Arc<dyn Notifier>,

    /// Missed-task threshold (inclusive)
    threshold: i64,
}

impl OverdueReviewer {
    /// Creates a reviewer with the default threshold
    pub fn new(db: PgPool, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_threshold(db, notifier, DEFAULT_THRESHOLD)
    }

    /// Creates a reviewer with a custom threshold
    pub fn with_threshold(db: PgPool, notifier: Arc<dyn Notifier>, threshold: i64) -> Self {
        OverdueReviewer {
            db,
            notifier,
            threshold,
        }
    }

    /// Gets the configured threshold
    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /// Whether a missed-task count triggers notification and deactivation
    ///
    /// One comparison for both actions: at the threshold counts, below it
    /// doesn't.
    pub fn meets_threshold(&self, missed_count: i64) -> bool {
        missed_count >= self.threshold
    }

    /// Runs one review pass using the current time as reference
    pub async fn run(&self) -> Result<ReviewReport, ReviewError> {
        self.run_at(Utc::now()).await
    }

    /// Runs one review pass against a fixed reference time
    ///
    /// Every overdue comparison in the pass uses `now`; a deadline exactly
    /// equal to `now` is not overdue.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::CandidateLoad`] if the candidate user set
    /// cannot be read. Per-user failures do not abort the run; they are
    /// recorded in the returned report.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<ReviewReport, ReviewError> {
        tracing::info!(
            reference_time = %now,
            threshold = self.threshold,
            "Starting overdue task review"
        );

        let candidates = User::list_active_with_role(&self.db, Role::User)
            .await
            .map_err(ReviewError::CandidateLoad)?;

        let mut report = ReviewReport {
            reference_time: Some(now),
            ..Default::default()
        };

        for user in candidates {
            report.evaluated += 1;

            let missed_count = match Task::count_overdue_assigned(&self.db, user.id, now).await {
                Ok(count) => count,
                Err(e) => {
                    tracing::error!(
                        user_id = %user.id,
                        username = %user.username,
                        error = %e,
                        "Failed to count overdue tasks, skipping user"
                    );
                    report.failures.push(UserFailure {
                        user_id: user.id,
                        username: user.username.clone(),
                        stage: FailureStage::CountTasks,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            if !self.meets_threshold(missed_count) {
                continue;
            }

            // Notification first, mirroring the review order; its outcome
            // has no bearing on the deactivation below.
            let message = Message::missed_deadline(&user.username, missed_count);
            match self.notifier.send(&message).await {
                Ok(()) => report.notified += 1,
                Err(e) => {
                    tracing::warn!(
                        user_id = %user.id,
                        username = %user.username,
                        notifier = self.notifier.name(),
                        error = %e,
                        "Failed to send overdue notification"
                    );
                    report.failures.push(UserFailure {
                        user_id: user.id,
                        username: user.username.clone(),
                        stage: FailureStage::Notify,
                        error: e.to_string(),
                    });
                }
            }

            match User::deactivate(&self.db, user.id).await {
                Ok(_) => {
                    tracing::warn!(
                        user_id = %user.id,
                        username = %user.username,
                        missed_count,
                        "Deactivated user (missed task threshold reached)"
                    );
                    report.deactivated.push(Deactivation {
                        user_id: user.id,
                        username: user.username.clone(),
                        missed_count,
                    });
                }
                Err(e) => {
                    tracing::error!(
                        user_id = %user.id,
                        username = %user.username,
                        error = %e,
                        "Failed to deactivate user"
                    );
                    report.failures.push(UserFailure {
                        user_id: user.id,
                        username: user.username.clone(),
                        stage: FailureStage::Deactivate,
                        error: e.to_string(),
                    });
                }
            }
        }

        // Completion marker, emitted whether or not anything changed
        tracing::info!(
            evaluated = report.evaluated,
            notified = report.notified,
            deactivated = report.deactivated.len(),
            failures = report.failures.len(),
            "Overdue task review completed"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MockNotifier;

    fn reviewer_with_threshold(threshold: i64) -> OverdueReviewer {
        // The pool is never used by the pure threshold checks; connect
        // lazily so no database is needed.
        let pool = PgPool::connect_lazy("postgresql://localhost/unused").unwrap();
        OverdueReviewer::with_threshold(pool, Arc::new(MockNotifier::new()), threshold)
    }

    #[test]
    fn test_default_threshold() {
        assert_eq!(DEFAULT_THRESHOLD, 5);
    }

    #[tokio::test]
    async fn test_meets_threshold_boundary() {
        let reviewer = reviewer_with_threshold(5);

        // Strictly below: no action
        assert!(!reviewer.meets_threshold(0));
        assert!(!reviewer.meets_threshold(4));

        // At the threshold: acts (>=, not >)
        assert!(reviewer.meets_threshold(5));
        assert!(reviewer.meets_threshold(6));
    }

    #[tokio::test]
    async fn test_meets_threshold_custom() {
        let reviewer = reviewer_with_threshold(1);
        assert!(!reviewer.meets_threshold(0));
        assert!(reviewer.meets_threshold(1));
        assert_eq!(reviewer.threshold(), 1);
    }

    #[test]
    fn test_failure_stage_as_str() {
        assert_eq!(FailureStage::CountTasks.as_str(), "count_tasks");
        assert_eq!(FailureStage::Notify.as_str(), "notify");
        assert_eq!(FailureStage::Deactivate.as_str(), "deactivate");
    }

    #[test]
    fn test_report_default_is_empty() {
        let report = ReviewReport::default();
        assert_eq!(report.evaluated, 0);
        assert_eq!(report.notified, 0);
        assert!(report.deactivated.is_empty());
        assert!(!report.has_failures());
    }

    #[test]
    fn test_report_has_failures() {
        let mut report = ReviewReport::default();
        report.failures.push(UserFailure {
            user_id: Uuid::new_v4(),
            username: "jsmith".to_string(),
            stage: FailureStage::Deactivate,
            error: "connection reset".to_string(),
        });
        assert!(report.has_failures());
    }

    // Full review passes against a live database are covered in
    // tests/review_tests.rs.
}
