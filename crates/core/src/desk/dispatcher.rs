//! The dispatch desk.
//!
//! Owns the waiting line, the counter pool and the lifetime totals behind a
//! single lock. Every operation validates first and commits afterwards, so a
//! failed call leaves all state untouched.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::clock::{minutes_between, Clock, SystemClock};
use crate::config::Config;
use crate::counter::{Counter, CounterId, NewCounter};
use crate::metrics;
use crate::queue::PriorityQueue;
use crate::request::{Category, NewRequest, Request, RequestId, RequestStatus};
use crate::stats::{DeskStats, Totals};

use super::history::{RetiredLog, RetiredRequest};
use super::types::{
    Announcement, AnnouncementKind, CancellationReceipt, CompletionReceipt, DeskError, MatchKind,
    RequestLocation, RequestView,
};

struct DeskState {
    queue: PriorityQueue,
    counters: Vec<Counter>,
    next_request_id: u64,
    next_counter_id: u32,
    totals: Totals,
    history: RetiredLog,
}

impl DeskState {
    fn new(config: &Config) -> Self {
        Self {
            queue: PriorityQueue::new(config.queue.capacity),
            counters: Vec::new(),
            next_request_id: config.queue.first_request_id,
            next_counter_id: 1,
            totals: Totals::default(),
            history: RetiredLog::new(config.history.limit),
        }
    }

    fn counter_index(&self, id: CounterId) -> Result<usize, DeskError> {
        self.counters
            .iter()
            .position(|c| c.id == id)
            .ok_or(DeskError::UnknownCounter(id))
    }
}

/// Matches waiting requests to service counters and drives their lifecycle.
pub struct Desk {
    config: Config,
    clock: Arc<dyn Clock>,
    state: Mutex<DeskState>,
}

impl Desk {
    /// Create an empty desk using the wall clock.
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an empty desk reading time from `clock`.
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        let state = DeskState::new(&config);
        Self {
            config,
            clock,
            state: Mutex::new(state),
        }
    }

    /// Create a desk and open the configured counter presets.
    pub fn from_config(config: Config, clock: Arc<dyn Clock>) -> Result<Self, DeskError> {
        let presets = config.counters.presets.clone();
        let desk = Self::with_clock(config, clock);
        for preset in presets {
            desk.add_counter(preset)?;
        }
        Ok(desk)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ========================================================================
    // Admission
    // ========================================================================

    /// Admit a request to the waiting line in priority order.
    pub fn submit(&self, new: NewRequest) -> Result<Request, DeskError> {
        let category = match Self::validate_request(&new) {
            Ok(category) => category,
            Err(e) => {
                metrics::REQUESTS_REJECTED
                    .with_label_values(&["invalid_input"])
                    .inc();
                warn!("Rejected submission: {}", e);
                return Err(e);
            }
        };

        let mut state = self.state.lock();

        if state.queue.is_full() {
            metrics::REQUESTS_REJECTED
                .with_label_values(&["queue_full"])
                .inc();
            warn!(
                "Rejected {} request: queue is full ({} waiting)",
                new.priority,
                state.queue.len()
            );
            return Err(DeskError::QueueFull {
                capacity: state.queue.capacity(),
            });
        }

        let estimated_wait_minutes = state
            .queue
            .estimate_wait(new.priority, self.config.queue.minutes_per_request);
        debug!(
            "Estimated wait for new {} request: {} minutes ({} ahead)",
            new.priority,
            estimated_wait_minutes,
            state.queue.ahead_of(new.priority)
        );

        let request = Request {
            id: RequestId(state.next_request_id),
            priority: new.priority,
            category,
            quantity: new.quantity,
            amount: new.amount,
            status: RequestStatus::Pending,
            submitted_at: self.clock.now(),
            assigned_at: None,
            service_started_at: None,
            completed_at: None,
            estimated_wait_minutes,
            metadata: new.metadata,
        };

        let position = state.queue.push(request.clone()).map_err(|_| DeskError::QueueFull {
            capacity: state.queue.capacity(),
        })?;
        state.next_request_id += 1;
        state.totals.submitted += 1;

        metrics::REQUESTS_SUBMITTED
            .with_label_values(&[request.priority.as_str()])
            .inc();
        metrics::QUEUE_DEPTH.set(state.queue.len() as i64);

        info!(
            "Admitted request {} ({}, {}) at position {}, estimated wait {} minutes",
            request.id, request.priority, request.category, position, estimated_wait_minutes
        );

        Ok(request)
    }

    fn validate_request(new: &NewRequest) -> Result<Category, DeskError> {
        if new.quantity == 0 {
            return Err(DeskError::InvalidQuantity);
        }
        if !new.amount.is_finite() || new.amount < 0.0 {
            return Err(DeskError::InvalidAmount(new.amount));
        }
        Category::new(&new.category).ok_or(DeskError::EmptyCategory)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Assign the next eligible waiting request to a counter.
    ///
    /// A specialized counter takes the first request in its category and
    /// falls back to the front of the line when none is waiting. A
    /// generalist counter always takes the front.
    pub fn pull_next(&self, counter_id: CounterId) -> Result<Request, DeskError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let idx = state.counter_index(counter_id)?;
        let counter = &state.counters[idx];
        if !counter.active {
            return Err(DeskError::CounterInactive(counter_id));
        }
        if let Some(current) = &counter.current {
            return Err(DeskError::CounterBusy {
                counter: counter_id,
                request: current.id,
            });
        }
        if state.queue.is_empty() {
            return Err(DeskError::QueueEmpty);
        }

        let (position, match_kind) = match &counter.specialization {
            Some(category) => match state.queue.position_of_category(category) {
                Some(pos) => (pos, MatchKind::Specialized),
                None => (0, MatchKind::Fallback),
            },
            None => (0, MatchKind::Generalist),
        };
        debug!(
            "Counter {} picked queue position {} ({})",
            counter_id,
            position,
            match_kind.as_str()
        );

        let mut request = state
            .queue
            .remove(position)
            .ok_or(DeskError::QueueEmpty)?;
        request.status = RequestStatus::Assigned;
        request.assigned_at = Some(self.clock.now());

        let counter = &mut state.counters[idx];
        counter.current = Some(request.clone());

        metrics::DISPATCHES
            .with_label_values(&[match_kind.as_str()])
            .inc();
        metrics::QUEUE_DEPTH.set(state.queue.len() as i64);

        info!(
            "Calling request {} ({}) to counter {} ({})",
            request.id, request.priority, counter.id, counter.label
        );

        Ok(request)
    }

    // ========================================================================
    // Service transitions
    // ========================================================================

    /// Begin serving the request called to a counter.
    pub fn start_service(&self, counter_id: CounterId) -> Result<Request, DeskError> {
        let mut state = self.state.lock();
        let idx = state.counter_index(counter_id)?;
        let now = self.clock.now();

        let counter = &mut state.counters[idx];
        let request = match counter.current.as_mut() {
            Some(request) if request.status == RequestStatus::Assigned => request,
            _ => return Err(DeskError::NoActiveAssignment(counter_id)),
        };

        request.status = RequestStatus::InService;
        request.service_started_at = Some(now);

        info!("Service started for request {} at counter {}", request.id, counter_id);

        Ok(request.clone())
    }

    /// Finish serving the request at a counter and recognize its revenue.
    ///
    /// A request that was called but never started is served from its
    /// assignment time and passes through `InService` here.
    pub fn complete_service(&self, counter_id: CounterId) -> Result<CompletionReceipt, DeskError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let idx = state.counter_index(counter_id)?;

        let counter = &mut state.counters[idx];
        let mut request = counter
            .current
            .take()
            .ok_or(DeskError::NoActiveAssignment(counter_id))?;

        let now = self.clock.now();
        let service_start = request
            .service_started_at
            .or(request.assigned_at)
            .unwrap_or(request.submitted_at);
        let service_minutes = minutes_between(service_start, now);
        let total_minutes = minutes_between(request.submitted_at, now);

        request.service_started_at = Some(service_start);
        request.status = RequestStatus::Completed;
        request.completed_at = Some(now);

        counter.record_service(service_minutes);
        state.totals.confirmed += 1;
        state.totals.revenue += request.amount;

        metrics::SERVICE_OUTCOMES
            .with_label_values(&["completed", request.priority.as_str()])
            .inc();
        metrics::SERVICE_DURATION
            .with_label_values(&[request.priority.as_str()])
            .observe(service_minutes);

        info!(
            "Completed request {} at counter {} in {:.1} minutes (amount {:.2}, counter average {:.1})",
            request.id, counter_id, service_minutes, request.amount, counter.average_service_minutes
        );

        state.history.record(counter_id, request.clone());

        Ok(CompletionReceipt {
            counter_id,
            confirmation_code: request.confirmation_code(),
            request,
            service_minutes,
            total_minutes,
        })
    }

    /// Drop the request at a counter without recognizing revenue.
    pub fn cancel_service(&self, counter_id: CounterId) -> Result<CancellationReceipt, DeskError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let idx = state.counter_index(counter_id)?;

        let counter = &mut state.counters[idx];
        let mut request = counter
            .current
            .take()
            .ok_or(DeskError::NoActiveAssignment(counter_id))?;

        let now = self.clock.now();
        request.status = RequestStatus::Cancelled;
        request.completed_at = Some(now);

        counter.total_cancelled += 1;
        state.totals.cancelled += 1;

        metrics::SERVICE_OUTCOMES
            .with_label_values(&["cancelled", request.priority.as_str()])
            .inc();

        info!("Cancelled request {} at counter {}", request.id, counter_id);

        state.history.record(counter_id, request.clone());

        Ok(CancellationReceipt {
            counter_id,
            total_minutes: minutes_between(request.submitted_at, now),
            request,
        })
    }

    // ========================================================================
    // Counter management
    // ========================================================================

    /// Open a new counter. It starts active and idle.
    pub fn add_counter(&self, spec: NewCounter) -> Result<CounterId, DeskError> {
        if spec.label.trim().is_empty() {
            return Err(DeskError::EmptyLabel);
        }

        let mut state = self.state.lock();
        let limit = self.config.counters.max_counters;
        if limit != 0 && state.counters.len() >= limit {
            warn!("Cannot open counter '{}': limit of {} reached", spec.label, limit);
            return Err(DeskError::CounterLimitReached { limit });
        }

        let id = CounterId(state.next_counter_id);
        let specialization = spec.specialization.as_deref().and_then(Category::new);
        match &specialization {
            Some(category) => info!(
                "Opened counter {} '{}' ({}) for {} requests",
                id, spec.label, spec.operator, category
            ),
            None => info!(
                "Opened counter {} '{}' ({}) for all requests",
                id, spec.label, spec.operator
            ),
        }

        let counter = Counter::new(
            id,
            spec,
            specialization,
            self.config.counters.default_service_minutes,
        );
        state.counters.push(counter);
        state.next_counter_id += 1;

        Ok(id)
    }

    /// Flip a counter between active and inactive, returning the new flag.
    ///
    /// A counter with a request at it cannot be deactivated.
    pub fn toggle_counter(&self, counter_id: CounterId) -> Result<bool, DeskError> {
        let mut state = self.state.lock();
        let idx = state.counter_index(counter_id)?;
        let counter = &mut state.counters[idx];

        if counter.active {
            if let Some(current) = &counter.current {
                return Err(DeskError::CannotDeactivateBusy {
                    counter: counter_id,
                    request: current.id,
                });
            }
        }

        counter.active = !counter.active;
        info!(
            "Counter {} ({}) is now {}",
            counter_id,
            counter.label,
            if counter.active { "active" } else { "inactive" }
        );

        Ok(counter.active)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn stats(&self) -> DeskStats {
        let state = self.state.lock();
        DeskStats::collect(&state.queue, &state.counters, &state.totals)
    }

    /// Look up a live request in the queue or at a counter.
    pub fn find(&self, id: RequestId) -> Result<RequestView, DeskError> {
        let state = self.state.lock();

        if let Some((position, request)) = state.queue.find(id) {
            return Ok(RequestView {
                request: request.clone(),
                location: RequestLocation::Waiting { position },
            });
        }

        state
            .counters
            .iter()
            .find_map(|counter| {
                let request = counter.current.as_ref().filter(|r| r.id == id)?;
                Some(RequestView {
                    request: request.clone(),
                    location: RequestLocation::AtCounter {
                        counter_id: counter.id,
                        counter_label: counter.label.clone(),
                        operator: counter.operator.clone(),
                    },
                })
            })
            .ok_or(DeskError::RequestNotFound(id))
    }

    /// Waiting requests in service order.
    pub fn waiting(&self) -> Vec<Request> {
        self.state.lock().queue.iter().cloned().collect()
    }

    pub fn counters(&self) -> Vec<Counter> {
        self.state.lock().counters.clone()
    }

    /// Current calling and serving lines, in counter order.
    pub fn announcements(&self) -> Vec<Announcement> {
        let state = self.state.lock();
        state
            .counters
            .iter()
            .filter_map(|counter| {
                let request = counter.current.as_ref()?;
                let kind = match request.status {
                    RequestStatus::Assigned => AnnouncementKind::Calling,
                    RequestStatus::InService => AnnouncementKind::Serving,
                    _ => return None,
                };
                Some(Announcement {
                    kind,
                    counter_id: counter.id,
                    counter_label: counter.label.clone(),
                    request_id: request.id,
                    priority: request.priority,
                    customer_name: request.metadata.customer_name.clone(),
                })
            })
            .collect()
    }

    /// Most recent completed and cancelled requests, oldest first.
    pub fn history(&self) -> Vec<RetiredRequest> {
        self.state.lock().history.snapshot()
    }

    /// Drop every request, counter and total. Ids restart from the configured values.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        *state = DeskState::new(&self.config);
        metrics::QUEUE_DEPTH.set(0);
        info!("Desk reset: all requests, counters and totals cleared");
    }
}
