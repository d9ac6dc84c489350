//! Testing utilities for deterministic desk scenarios.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use queuedesk_core::testing::ManualClock;
//! use queuedesk_core::{Config, Desk};
//!
//! let clock = Arc::new(ManualClock::new());
//! let desk = Desk::with_clock(Config::default(), clock.clone());
//!
//! // ... pull and start a request, then
//! clock.advance_minutes(5);
//! ```

mod manual_clock;

pub use manual_clock::ManualClock;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::request::{Category, Priority, Request, RequestId, RequestMetadata, RequestStatus};

    /// A pending request as the queue would hold it.
    pub fn pending_request(id: u64, category: &str, priority: Priority) -> Request {
        Request {
            id: RequestId(id),
            priority,
            category: Category::new(category).expect("fixture category must not be empty"),
            quantity: 1,
            amount: 10.0,
            status: RequestStatus::Pending,
            submitted_at: Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
            assigned_at: None,
            service_started_at: None,
            completed_at: None,
            estimated_wait_minutes: 0,
            metadata: RequestMetadata::default(),
        }
    }

    /// Metadata carrying only a customer name.
    pub fn customer(name: &str) -> RequestMetadata {
        RequestMetadata::customer(name)
    }
}
