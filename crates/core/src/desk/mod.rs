//! Dispatch desk: matches waiting requests to counters.
//!
//! The desk drives each request through its lifecycle:
//! - **Admission**: priority-ordered insertion with a wait estimate
//! - **Dispatch**: specialized match, fallback, or front of the line
//! - **Service**: start, complete (revenue) or cancel, then retire

mod dispatcher;
mod history;
mod types;

pub use dispatcher::Desk;
pub use history::RetiredRequest;
pub use types::{
    Announcement, AnnouncementKind, CancellationReceipt, CompletionReceipt, DeskError, ErrorKind,
    MatchKind, RequestLocation, RequestView,
};
