//! Types for the dispatch desk.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::counter::CounterId;
use crate::request::{Priority, Request, RequestId};

/// Coarse error classes, stable across error variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Queue or counter pool is full.
    CapacityExceeded,
    /// Unknown counter or request id.
    NotFound,
    /// Entity is not in the lifecycle state the operation needs.
    InvalidState,
    /// Rejected input value.
    InvalidInput,
}

/// Errors returned by desk operations.
///
/// A failed operation never mutates queue, counter or statistics state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeskError {
    /// The waiting line is at capacity.
    #[error("queue is full: {capacity} requests already waiting")]
    QueueFull { capacity: usize },

    /// The counter pool is at its configured limit.
    #[error("counter limit reached: at most {limit} counters")]
    CounterLimitReached { limit: usize },

    #[error("unknown counter: {0}")]
    UnknownCounter(CounterId),

    /// Request is neither waiting nor at a counter.
    #[error("request not found: {0}")]
    RequestNotFound(RequestId),

    #[error("no requests waiting")]
    QueueEmpty,

    #[error("counter {0} is not active")]
    CounterInactive(CounterId),

    #[error("counter {counter} is busy with request {request}")]
    CounterBusy {
        counter: CounterId,
        request: RequestId,
    },

    /// Counter holds no request in the state the transition starts from.
    #[error("counter {0} has no active assignment")]
    NoActiveAssignment(CounterId),

    #[error("cannot deactivate counter {counter}: serving request {request}")]
    CannotDeactivateBusy {
        counter: CounterId,
        request: RequestId,
    },

    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("amount must be a non-negative number, got {0}")]
    InvalidAmount(f64),

    #[error("category cannot be empty")]
    EmptyCategory,

    #[error("counter label cannot be empty")]
    EmptyLabel,

    #[error("unknown priority: {0}")]
    UnknownPriority(String),
}

impl DeskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeskError::QueueFull { .. } | DeskError::CounterLimitReached { .. } => {
                ErrorKind::CapacityExceeded
            }
            DeskError::UnknownCounter(_) | DeskError::RequestNotFound(_) => ErrorKind::NotFound,
            DeskError::QueueEmpty
            | DeskError::CounterInactive(_)
            | DeskError::CounterBusy { .. }
            | DeskError::NoActiveAssignment(_)
            | DeskError::CannotDeactivateBusy { .. } => ErrorKind::InvalidState,
            DeskError::InvalidQuantity
            | DeskError::InvalidAmount(_)
            | DeskError::EmptyCategory
            | DeskError::EmptyLabel
            | DeskError::UnknownPriority(_) => ErrorKind::InvalidInput,
        }
    }
}

impl From<crate::request::UnknownPriority> for DeskError {
    fn from(err: crate::request::UnknownPriority) -> Self {
        DeskError::UnknownPriority(err.0)
    }
}

/// Where a live request currently is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestLocation {
    /// In the waiting line; `position` 0 is next to be served.
    Waiting { position: usize },
    /// Assigned to or being served at a counter.
    AtCounter {
        counter_id: CounterId,
        counter_label: String,
        operator: String,
    },
}

/// Result of looking up a live request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestView {
    pub request: Request,
    pub location: RequestLocation,
}

/// Returned by a successful completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionReceipt {
    pub counter_id: CounterId,
    pub request: Request,
    /// Minutes from service start to completion.
    pub service_minutes: f64,
    /// Minutes from submission to completion.
    pub total_minutes: f64,
    pub confirmation_code: String,
}

/// Returned by a successful cancellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationReceipt {
    pub counter_id: CounterId,
    pub request: Request,
    /// Minutes from submission to cancellation.
    pub total_minutes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementKind {
    /// Customer is called to the counter.
    Calling,
    /// Customer is being served.
    Serving,
}

/// A line on the announcement board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub kind: AnnouncementKind,
    pub counter_id: CounterId,
    pub counter_label: String,
    pub request_id: RequestId,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

/// How a dispatched request was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Specialized counter found a request in its category.
    Specialized,
    /// Specialized counter found no match and took the front request.
    Fallback,
    /// Generalist counter took the front request.
    Generalist,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Specialized => "specialized",
            MatchKind::Fallback => "fallback",
            MatchKind::Generalist => "generalist",
        }
    }
}
