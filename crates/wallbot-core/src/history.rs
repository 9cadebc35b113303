//! Bounded history of recent moves and sensor snapshots.

use std::collections::VecDeque;
use wallbot_proto::{Move, SensorSnapshot};

/// A fixed-capacity FIFO buffer. Inserting at capacity evicts the oldest item.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> HistoryBuffer<T> {
    /// Creates an empty buffer. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an item, evicting the oldest one if the buffer is full.
    pub fn push(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the most recently inserted item.
    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

/// Move and sensor history owned by the run state.
#[derive(Debug, Clone)]
pub struct HistoryTracker {
    moves: HistoryBuffer<Move>,
    snapshots: HistoryBuffer<SensorSnapshot>,
}

impl HistoryTracker {
    /// Creates a tracker whose buffers both hold `length` entries.
    pub fn new(length: usize) -> Self {
        Self {
            moves: HistoryBuffer::with_capacity(length),
            snapshots: HistoryBuffer::with_capacity(length),
        }
    }

    pub fn record_move(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    pub fn record_snapshot(&mut self, snapshot: SensorSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// Returns the previous recorded move, or `None` before the first one.
    pub fn last_move(&self) -> Option<Move> {
        self.moves.last().copied()
    }

    pub fn last_snapshot(&self) -> Option<&SensorSnapshot> {
        self.snapshots.last()
    }

    pub fn moves(&self) -> &HistoryBuffer<Move> {
        &self.moves
    }

    pub fn snapshots(&self) -> &HistoryBuffer<SensorSnapshot> {
        &self.snapshots
    }
}

impl Default for HistoryTracker {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_under_capacity() {
        let mut buf = HistoryBuffer::with_capacity(5);
        buf.push(1);
        buf.push(2);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.last(), Some(&2));
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_eviction_keeps_most_recent_in_order() {
        let mut buf = HistoryBuffer::with_capacity(5);
        for i in 0..12 {
            buf.push(i);
            assert!(buf.len() <= 5);
        }
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_holds_exactly_capacity_items() {
        let mut buf = HistoryBuffer::with_capacity(5);
        for i in 0..5 {
            buf.push(i);
        }
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.iter().next(), Some(&0));
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut buf = HistoryBuffer::with_capacity(0);
        buf.push('a');
        buf.push('b');
        assert_eq!(buf.capacity(), 1);
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec!['b']);
    }

    #[test]
    fn test_last_move_on_empty_history() {
        let history = HistoryTracker::default();
        assert_eq!(history.last_move(), None);
        assert!(history.last_snapshot().is_none());
    }

    #[test]
    fn test_record_moves_and_snapshots() {
        let mut history = HistoryTracker::new(3);
        history.record_move(Move::Forward);
        history.record_move(Move::Right);
        history.record_snapshot(SensorSnapshot::at_distance(42.0));

        assert_eq!(history.last_move(), Some(Move::Right));
        assert_eq!(history.moves().len(), 2);
        assert_eq!(history.last_snapshot().map(|s| s.distance_mm), Some(42.0));
        assert_eq!(history.snapshots().capacity(), 3);
    }
}
