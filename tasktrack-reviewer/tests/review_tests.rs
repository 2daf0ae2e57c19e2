/// Integration tests for the overdue review run
///
/// These tests exercise the full review pass against a live database:
/// candidate selection, overdue counting, the threshold policy, and the
/// notification/deactivation pair.
///
/// They require a running PostgreSQL database.
/// Run with: cargo test -p tasktrack-reviewer -- --test-threads=1
mod common;

use chrono::{Duration, TimeZone, Utc};
use common::TestContext;
use std::sync::Arc;
use tasktrack_reviewer::notify::MockNotifier;
use tasktrack_reviewer::review::OverdueReviewer;
use tasktrack_shared::models::task::TaskStatus;
use tasktrack_shared::models::user::{Role, User};

/// Fixed reference time, whole seconds so stored timestamps round-trip
/// exactly
fn reference_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// A user below the threshold keeps their active flag and gets no
/// notification
#[tokio::test]
async fn test_below_threshold_untouched() {
    let mut ctx = TestContext::new().await.unwrap();
    let now = reference_time();

    let user = ctx.create_user(Role::User, true).await.unwrap();
    for _ in 0..4 {
        ctx.create_task(user.id, TaskStatus::Assigned, now - Duration::hours(1))
            .await
            .unwrap();
    }

    let notifier = Arc::new(MockNotifier::new());
    let reviewer = OverdueReviewer::new(ctx.db.clone(), notifier.clone());
    let report = reviewer.run_at(now).await.unwrap();

    assert!(report.deactivated.iter().all(|d| d.user_id != user.id));
    assert!(notifier
        .sent_messages()
        .iter()
        .all(|m| !m.body.contains(&user.username)));

    let reloaded = User::find_by_id(&ctx.db, user.id).await.unwrap().unwrap();
    assert!(reloaded.is_active);

    ctx.cleanup().await.unwrap();
}

/// Exactly five overdue assigned tasks deactivates the user and sends one
/// notification referencing the count
#[tokio::test]
async fn test_at_threshold_deactivates_and_notifies() {
    let mut ctx = TestContext::new().await.unwrap();
    let now = reference_time();

    let user = ctx.create_user(Role::User, true).await.unwrap();
    for _ in 0..5 {
        ctx.create_task(user.id, TaskStatus::Assigned, now - Duration::hours(1))
            .await
            .unwrap();
    }

    let notifier = Arc::new(MockNotifier::new());
    let reviewer = OverdueReviewer::new(ctx.db.clone(), notifier.clone());
    let report = reviewer.run_at(now).await.unwrap();

    let deactivation = report
        .deactivated
        .iter()
        .find(|d| d.user_id == user.id)
        .expect("user at threshold should be deactivated");
    assert_eq!(deactivation.missed_count, 5);

    let messages: Vec<_> = notifier
        .sent_messages()
        .into_iter()
        .filter(|m| m.body.contains(&user.username))
        .collect();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].body.contains('5'));
    assert_eq!(messages[0].subject, "User missed task deadline");

    let reloaded = User::find_by_id(&ctx.db, user.id).await.unwrap().unwrap();
    assert!(!reloaded.is_active);

    ctx.cleanup().await.unwrap();
}

/// Completed tasks never count as missed, even past their deadline
#[tokio::test]
async fn test_completed_tasks_never_count() {
    let mut ctx = TestContext::new().await.unwrap();
    let now = reference_time();

    let user = ctx.create_user(Role::User, true).await.unwrap();
    for _ in 0..4 {
        ctx.create_task(user.id, TaskStatus::Assigned, now - Duration::hours(1))
            .await
            .unwrap();
    }
    for _ in 0..3 {
        ctx.create_task(user.id, TaskStatus::Completed, now - Duration::hours(1))
            .await
            .unwrap();
    }

    let notifier = Arc::new(MockNotifier::new());
    let reviewer = OverdueReviewer::new(ctx.db.clone(), notifier.clone());
    let report = reviewer.run_at(now).await.unwrap();

    // 4 + 3 tasks, but missed_count is 4: below the threshold
    assert!(report.deactivated.iter().all(|d| d.user_id != user.id));

    let reloaded = User::find_by_id(&ctx.db, user.id).await.unwrap().unwrap();
    assert!(reloaded.is_active);

    ctx.cleanup().await.unwrap();
}

/// A deadline exactly equal to the reference time is not overdue
#[tokio::test]
async fn test_deadline_equal_to_now_not_overdue() {
    let mut ctx = TestContext::new().await.unwrap();
    let now = reference_time();

    let user = ctx.create_user(Role::User, true).await.unwrap();
    // 4 clearly overdue plus 1 exactly at the boundary: stays at 4
    for _ in 0..4 {
        ctx.create_task(user.id, TaskStatus::Assigned, now - Duration::hours(1))
            .await
            .unwrap();
    }
    ctx.create_task(user.id, TaskStatus::Assigned, now)
        .await
        .unwrap();

    let notifier = Arc::new(MockNotifier::new());
    let reviewer = OverdueReviewer::new(ctx.db.clone(), notifier.clone());
    let report = reviewer.run_at(now).await.unwrap();

    assert!(report.deactivated.iter().all(|d| d.user_id != user.id));

    let reloaded = User::find_by_id(&ctx.db, user.id).await.unwrap().unwrap();
    assert!(reloaded.is_active);

    ctx.cleanup().await.unwrap();
}

/// Inactive users are not candidates, whatever their overdue count
#[tokio::test]
async fn test_inactive_user_not_selected() {
    let mut ctx = TestContext::new().await.unwrap();
    let now = reference_time();

    let user = ctx.create_user(Role::User, false).await.unwrap();
    for _ in 0..10 {
        ctx.create_task(user.id, TaskStatus::Assigned, now - Duration::hours(1))
            .await
            .unwrap();
    }

    let notifier = Arc::new(MockNotifier::new());
    let reviewer = OverdueReviewer::new(ctx.db.clone(), notifier.clone());
    let report = reviewer.run_at(now).await.unwrap();

    assert!(report.deactivated.iter().all(|d| d.user_id != user.id));
    assert!(report.failures.iter().all(|f| f.user_id != user.id));
    assert!(notifier
        .sent_messages()
        .iter()
        .all(|m| !m.body.contains(&user.username)));

    ctx.cleanup().await.unwrap();
}

/// Managers and admins are never candidates, only role `user`
#[tokio::test]
async fn test_manager_not_selected() {
    let mut ctx = TestContext::new().await.unwrap();
    let now = reference_time();

    let manager = ctx.create_user(Role::Manager, true).await.unwrap();
    for _ in 0..6 {
        ctx.create_task(manager.id, TaskStatus::Assigned, now - Duration::hours(1))
            .await
            .unwrap();
    }

    let notifier = Arc::new(MockNotifier::new());
    let reviewer = OverdueReviewer::new(ctx.db.clone(), notifier.clone());
    let report = reviewer.run_at(now).await.unwrap();

    assert!(report.deactivated.iter().all(|d| d.user_id != manager.id));

    let reloaded = User::find_by_id(&ctx.db, manager.id).await.unwrap().unwrap();
    assert!(reloaded.is_active);

    ctx.cleanup().await.unwrap();
}

/// A second run over unchanged data selects a strict subset: the user
/// deactivated in the first run is gone from the second
#[tokio::test]
async fn test_second_run_excludes_deactivated() {
    let mut ctx = TestContext::new().await.unwrap();
    let now = reference_time();

    let user = ctx.create_user(Role::User, true).await.unwrap();
    for _ in 0..5 {
        ctx.create_task(user.id, TaskStatus::Assigned, now - Duration::hours(1))
            .await
            .unwrap();
    }

    let notifier = Arc::new(MockNotifier::new());
    let reviewer = OverdueReviewer::new(ctx.db.clone(), notifier.clone());

    let first = reviewer.run_at(now).await.unwrap();
    assert!(first.deactivated.iter().any(|d| d.user_id == user.id));

    let second = reviewer.run_at(now).await.unwrap();
    assert!(second.deactivated.iter().all(|d| d.user_id != user.id));

    // Still exactly one notification for this user across both runs
    let messages: Vec<_> = notifier
        .sent_messages()
        .into_iter()
        .filter(|m| m.body.contains(&user.username))
        .collect();
    assert_eq!(messages.len(), 1);

    ctx.cleanup().await.unwrap();
}

/// A failing notifier does not block deactivation
#[tokio::test]
async fn test_notification_failure_still_deactivates() {
    let mut ctx = TestContext::new().await.unwrap();
    let now = reference_time();

    let user = ctx.create_user(Role::User, true).await.unwrap();
    for _ in 0..5 {
        ctx.create_task(user.id, TaskStatus::Assigned, now - Duration::hours(1))
            .await
            .unwrap();
    }

    let notifier = Arc::new(MockNotifier::failing());
    let reviewer = OverdueReviewer::new(ctx.db.clone(), notifier.clone());
    let report = reviewer.run_at(now).await.unwrap();

    // Deactivated despite the failed send, and the failure is reported
    assert!(report.deactivated.iter().any(|d| d.user_id == user.id));
    assert!(report
        .failures
        .iter()
        .any(|f| f.user_id == user.id
            && f.stage == tasktrack_reviewer::review::FailureStage::Notify));

    let reloaded = User::find_by_id(&ctx.db, user.id).await.unwrap().unwrap();
    assert!(!reloaded.is_active);

    ctx.cleanup().await.unwrap();
}

/// A custom threshold applies the same >= comparison
#[tokio::test]
async fn test_custom_threshold() {
    let mut ctx = TestContext::new().await.unwrap();
    let now = reference_time();

    let user = ctx.create_user(Role::User, true).await.unwrap();
    for _ in 0..2 {
        ctx.create_task(user.id, TaskStatus::Assigned, now - Duration::hours(1))
            .await
            .unwrap();
    }

    let notifier = Arc::new(MockNotifier::new());
    let reviewer = OverdueReviewer::with_threshold(ctx.db.clone(), notifier.clone(), 2);
    let report = reviewer.run_at(now).await.unwrap();

    let deactivation = report
        .deactivated
        .iter()
        .find(|d| d.user_id == user.id)
        .expect("user at custom threshold should be deactivated");
    assert_eq!(deactivation.missed_count, 2);

    ctx.cleanup().await.unwrap();
}
