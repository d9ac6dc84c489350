//! Service counters that requests are dispatched to.

mod types;

pub use types::{Counter, CounterId, CounterStatus, NewCounter};
