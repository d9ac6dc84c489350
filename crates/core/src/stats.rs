//! Read-side statistics over the live desk state.
//!
//! Queue size and per-priority counts are always derived from the live queue.
//! Only the lifetime totals in [`Totals`] are maintained incrementally, by the
//! desk, at submission and terminal transitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::counter::{Counter, CounterId, CounterStatus};
use crate::queue::PriorityQueue;
use crate::request::Priority;

/// Lifetime totals updated by the desk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub submitted: u64,
    pub confirmed: u64,
    pub cancelled: u64,
    /// Sum of amounts of completed requests.
    pub revenue: f64,
}

/// Snapshot of one counter for status boards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSummary {
    pub id: CounterId,
    pub label: String,
    pub operator: String,
    pub status: CounterStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    pub total_served: u32,
    pub total_cancelled: u32,
    pub average_service_minutes: f64,
}

impl From<&Counter> for CounterSummary {
    fn from(counter: &Counter) -> Self {
        Self {
            id: counter.id,
            label: counter.label.clone(),
            operator: counter.operator.clone(),
            status: counter.status(),
            specialization: counter.specialization.as_ref().map(|c| c.to_string()),
            total_served: counter.total_served,
            total_cancelled: counter.total_cancelled,
            average_service_minutes: counter.average_service_minutes,
        }
    }
}

/// Aggregate view returned by `Desk::stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskStats {
    /// Requests waiting in the queue.
    pub queue_size: usize,
    /// Waiting requests per priority class.
    pub by_priority: BTreeMap<Priority, usize>,
    /// Requests assigned to or being served at a counter.
    pub at_counters: usize,
    pub submitted: u64,
    pub confirmed: u64,
    pub cancelled: u64,
    pub revenue: f64,
    /// `confirmed / submitted`, 0 when nothing was submitted.
    pub success_rate: f64,
    pub counters: Vec<CounterSummary>,
}

impl DeskStats {
    /// Recompute the view. Never mutates its inputs.
    pub fn collect(queue: &PriorityQueue, counters: &[Counter], totals: &Totals) -> Self {
        let by_priority = Priority::ALL
            .iter()
            .map(|&p| (p, queue.count_priority(p)))
            .collect();

        let at_counters = counters.iter().filter(|c| c.current.is_some()).count();

        let success_rate = if totals.submitted == 0 {
            0.0
        } else {
            totals.confirmed as f64 / totals.submitted as f64
        };

        Self {
            queue_size: queue.len(),
            by_priority,
            at_counters,
            submitted: totals.submitted,
            confirmed: totals.confirmed,
            cancelled: totals.cancelled,
            revenue: totals.revenue,
            success_rate,
            counters: counters.iter().map(CounterSummary::from).collect(),
        }
    }

    /// `submitted == waiting + at counters + confirmed + cancelled`.
    pub fn is_conserved(&self) -> bool {
        self.submitted
            == self.queue_size as u64 + self.at_counters as u64 + self.confirmed + self.cancelled
    }
}
