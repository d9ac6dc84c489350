//! Bounded log of requests that reached a terminal status.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::counter::CounterId;
use crate::request::Request;

/// A completed or cancelled request and the counter that retired it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetiredRequest {
    pub counter_id: CounterId,
    pub request: Request,
}

/// Keeps the most recent `limit` retired requests, oldest first.
#[derive(Debug, Clone)]
pub(crate) struct RetiredLog {
    entries: VecDeque<RetiredRequest>,
    limit: usize,
}

impl RetiredLog {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    pub(crate) fn record(&mut self, counter_id: CounterId, request: Request) {
        if self.limit == 0 {
            return;
        }
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(RetiredRequest {
            counter_id,
            request,
        });
    }

    pub(crate) fn snapshot(&self) -> Vec<RetiredRequest> {
        self.entries.iter().cloned().collect()
    }
}
