//! # tasktrack reviewer library
//!
//! The overdue review job: one pass over all active regular users,
//! counting overdue tasks and notifying/deactivating users who crossed
//! the missed-task threshold.
//!
//! ## Modules
//!
//! - `config`: Environment configuration (threshold, addresses, gateway)
//! - `notify`: Notification seam (HTTP gateway + mock)
//! - `review`: The review pass and its run report

pub mod config;
pub mod notify;
pub mod review;
