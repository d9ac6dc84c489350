//! Bounded waiting line ordered by priority class, then arrival.

use std::collections::VecDeque;

use serde::Serialize;

use crate::request::{Category, Priority, Request, RequestId};

/// The waiting line.
///
/// Entries are kept in service order: non-increasing priority, and within a
/// priority class, ascending arrival. New entries are spliced in with a
/// stable scan; existing entries are never re-sorted.
#[derive(Debug, Clone, Serialize)]
pub struct PriorityQueue {
    entries: VecDeque<Request>,
    capacity: usize,
}

impl PriorityQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of waiting requests that will be served before a new request
    /// of the given priority (every entry of equal or higher priority).
    pub fn ahead_of(&self, priority: Priority) -> usize {
        self.entries.iter().filter(|r| r.priority >= priority).count()
    }

    /// Advisory wait for a request about to be submitted with `priority`.
    ///
    /// The base estimate (`ahead_of * minutes_per_request`) is scaled down by
    /// the priority's expedite factor and truncated to whole minutes.
    pub fn estimate_wait(&self, priority: Priority, minutes_per_request: u32) -> u32 {
        let ahead = u32::try_from(self.ahead_of(priority)).unwrap_or(u32::MAX);
        let base = ahead.saturating_mul(minutes_per_request);
        (f64::from(base) * priority.wait_factor()) as u32
    }

    /// Index a new request of this priority would be inserted at: just
    /// before the first entry with strictly lower priority.
    pub fn insertion_index(&self, priority: Priority) -> usize {
        self.entries
            .iter()
            .position(|r| r.priority < priority)
            .unwrap_or(self.entries.len())
    }

    /// Insert a request in priority order, returning its position.
    ///
    /// Hands the request back when the line is at capacity.
    pub fn push(&mut self, request: Request) -> Result<usize, Request> {
        if self.is_full() {
            return Err(request);
        }
        let index = self.insertion_index(request.priority);
        self.entries.insert(index, request);
        Ok(index)
    }

    /// Position of the first waiting request in `category`.
    pub fn position_of_category(&self, category: &Category) -> Option<usize> {
        self.entries.iter().position(|r| &r.category == category)
    }

    /// Remove the entry at `index`, shifting later entries forward.
    pub fn remove(&mut self, index: usize) -> Option<Request> {
        self.entries.remove(index)
    }

    pub fn pop_front(&mut self) -> Option<Request> {
        self.entries.pop_front()
    }

    pub fn front(&self) -> Option<&Request> {
        self.entries.front()
    }

    /// Find a waiting request by id along with its position.
    pub fn find(&self, id: RequestId) -> Option<(usize, &Request)> {
        self.entries.iter().enumerate().find(|(_, r)| r.id == id)
    }

    /// Number of waiting requests in each priority class.
    pub fn count_priority(&self, priority: Priority) -> usize {
        self.entries.iter().filter(|r| r.priority == priority).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn ids(queue: &PriorityQueue) -> Vec<u64> {
        queue.iter().map(|r| r.id.0).collect()
    }

    fn push(queue: &mut PriorityQueue, id: u64, priority: Priority) -> usize {
        queue
            .push(fixtures::pending_request(id, "movie", priority))
            .unwrap()
    }

    #[test]
    fn test_emergency_goes_ahead_of_normals() {
        let mut queue = PriorityQueue::new(10);
        push(&mut queue, 1, Priority::Normal);
        push(&mut queue, 2, Priority::Normal);
        push(&mut queue, 3, Priority::Normal);
        let pos = push(&mut queue, 4, Priority::Emergency);

        assert_eq!(pos, 0);
        assert_eq!(ids(&queue), vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_equal_priority_keeps_arrival_order() {
        let mut queue = PriorityQueue::new(10);
        push(&mut queue, 1, Priority::Vip);
        push(&mut queue, 2, Priority::Normal);
        push(&mut queue, 3, Priority::Vip);
        push(&mut queue, 4, Priority::Emergency);
        push(&mut queue, 5, Priority::Emergency);
        push(&mut queue, 6, Priority::Premium);

        assert_eq!(ids(&queue), vec![4, 5, 1, 3, 6, 2]);
    }

    #[test]
    fn test_vip_does_not_jump_existing_vip_front() {
        let mut queue = PriorityQueue::new(10);
        push(&mut queue, 1, Priority::Vip);
        push(&mut queue, 2, Priority::Vip);
        assert_eq!(ids(&queue), vec![1, 2]);
    }

    #[test]
    fn test_push_full_returns_request() {
        let mut queue = PriorityQueue::new(1);
        push(&mut queue, 1, Priority::Normal);
        let rejected = queue
            .push(fixtures::pending_request(2, "movie", Priority::Emergency))
            .unwrap_err();
        assert_eq!(rejected.id, RequestId(2));
        assert_eq!(ids(&queue), vec![1]);
    }

    #[test]
    fn test_estimate_wait_counts_higher_or_equal() {
        let mut queue = PriorityQueue::new(10);
        push(&mut queue, 1, Priority::Normal);
        push(&mut queue, 2, Priority::Normal);
        push(&mut queue, 3, Priority::Vip);
        push(&mut queue, 4, Priority::Premium);

        // 4 ahead * 4 minutes
        assert_eq!(queue.estimate_wait(Priority::Normal, 4), 16);
        // 2 ahead * 4 * 0.7 = 5.6
        assert_eq!(queue.estimate_wait(Priority::Premium, 4), 5);
        // 1 ahead * 4 * 0.5
        assert_eq!(queue.estimate_wait(Priority::Vip, 4), 2);
        // nobody ahead
        assert_eq!(queue.estimate_wait(Priority::Emergency, 4), 0);
    }

    #[test]
    fn test_estimate_wait_empty_queue() {
        let queue = PriorityQueue::new(10);
        for priority in Priority::ALL {
            assert_eq!(queue.estimate_wait(priority, 4), 0);
        }
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut queue = PriorityQueue::new(10);
        for id in 1..=4 {
            push(&mut queue, id, Priority::Normal);
        }
        let removed = queue.remove(1).unwrap();
        assert_eq!(removed.id, RequestId(2));
        assert_eq!(ids(&queue), vec![1, 3, 4]);
    }

    #[test]
    fn test_position_of_category() {
        let mut queue = PriorityQueue::new(10);
        queue
            .push(fixtures::pending_request(1, "hotel", Priority::Normal))
            .unwrap();
        queue
            .push(fixtures::pending_request(2, "flight", Priority::Normal))
            .unwrap();

        let flight = Category::new("flight").unwrap();
        let train = Category::new("train").unwrap();
        assert_eq!(queue.position_of_category(&flight), Some(1));
        assert_eq!(queue.position_of_category(&train), None);
    }

    #[test]
    fn test_find_and_count_priority() {
        let mut queue = PriorityQueue::new(10);
        push(&mut queue, 1, Priority::Normal);
        push(&mut queue, 2, Priority::Emergency);

        let (pos, req) = queue.find(RequestId(1)).unwrap();
        assert_eq!(pos, 1);
        assert_eq!(req.priority, Priority::Normal);
        assert!(queue.find(RequestId(9)).is_none());
        assert_eq!(queue.count_priority(Priority::Emergency), 1);
        assert_eq!(queue.count_priority(Priority::Vip), 0);
    }

    #[test]
    fn test_every_arrival_order_keeps_invariant() {
        // All 4^4 arrival sequences of four requests.
        for mask in 0..256u32 {
            let mut queue = PriorityQueue::new(8);
            for slot in 0..4u32 {
                let priority = Priority::ALL[((mask >> (slot * 2)) & 0b11) as usize];
                push(&mut queue, u64::from(slot), priority);
            }

            let entries: Vec<&Request> = queue.iter().collect();
            for pair in entries.windows(2) {
                assert!(pair[0].priority >= pair[1].priority, "mask {mask}");
                if pair[0].priority == pair[1].priority {
                    assert!(pair[0].id < pair[1].id, "mask {mask}");
                }
            }
        }
    }
}
