//! Service counter types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::request::{Category, Request};

/// Identifier of a service counter, assigned from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterId(pub u32);

impl fmt::Display for CounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A service counter (ticket window, booking desk, teller).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counter {
    pub id: CounterId,

    pub label: String,

    /// Operator staffing the counter (display only).
    pub operator: String,

    /// Category this counter prefers. `None` serves every category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<Category>,

    /// Inactive counters are skipped by dispatch.
    pub active: bool,

    /// Request currently at this counter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<Request>,

    /// Requests completed at this counter.
    pub total_served: u32,

    /// Requests cancelled at this counter.
    #[serde(default)]
    pub total_cancelled: u32,

    /// Running mean of service time over completed requests.
    pub average_service_minutes: f64,
}

impl Counter {
    pub(crate) fn new(
        id: CounterId,
        spec: NewCounter,
        specialization: Option<Category>,
        default_service_minutes: f64,
    ) -> Self {
        Self {
            id,
            label: spec.label,
            operator: spec.operator,
            specialization,
            active: true,
            current: None,
            total_served: 0,
            total_cancelled: 0,
            average_service_minutes: default_service_minutes,
        }
    }

    /// True when the counter is active and not serving anyone.
    pub fn is_available(&self) -> bool {
        self.active && self.current.is_none()
    }

    /// Returns true if the counter prefers requests of this category.
    pub fn specializes_in(&self, category: &Category) -> bool {
        self.specialization.as_ref() == Some(category)
    }

    /// Coarse status label shown on counter boards.
    pub fn status(&self) -> CounterStatus {
        if !self.active {
            CounterStatus::Inactive
        } else if self.current.is_some() {
            CounterStatus::Busy
        } else {
            CounterStatus::Available
        }
    }

    /// Folds one completed service into the running statistics.
    ///
    /// `total_served` is incremented first so the first completion replaces
    /// the configured default average.
    pub(crate) fn record_service(&mut self, elapsed_minutes: f64) {
        self.total_served += 1;
        self.average_service_minutes +=
            (elapsed_minutes - self.average_service_minutes) / f64::from(self.total_served);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterStatus {
    Available,
    Busy,
    Inactive,
}

/// Input for opening a new counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCounter {
    pub label: String,
    pub operator: String,
    /// Category tag; empty or missing means generalist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

impl NewCounter {
    /// A counter that serves every category.
    pub fn generalist(label: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            operator: operator.into(),
            specialization: None,
        }
    }

    /// A counter that prefers one category.
    pub fn specialized(
        label: impl Into<String>,
        operator: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            operator: operator.into(),
            specialization: Some(category.into()),
        }
    }
}
