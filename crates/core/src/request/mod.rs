//! Reservation and ticket requests.

mod types;

pub use types::{
    Category, NewRequest, Priority, Request, RequestId, RequestMetadata, RequestStatus,
    UnknownPriority,
};
