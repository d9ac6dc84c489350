//! Priority-ordered waiting line.

mod priority_queue;

pub use priority_queue::PriorityQueue;
