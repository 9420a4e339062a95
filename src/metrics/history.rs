use crate::telemetry::MetricSnapshot;
use serde::Serialize;
use std::collections::{vec_deque, VecDeque};

pub const DEFAULT_CAPACITY: usize = 50;

/// Fixed-capacity chronological record. Appends evict the oldest entry once the
/// buffer is full; entries are never merged or downsampled.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryBuffer<T = MetricSnapshot> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> HistoryBuffer<T> {
    /// A zero capacity is bumped to one so `latest()` always reflects the last append.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, item: T) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(item);
    }

    /// Swaps the whole contents for `items`, keeping only the newest `capacity`.
    pub fn replace(&mut self, items: impl IntoIterator<Item = T>) {
        self.buffer.clear();
        for item in items {
            self.append(item);
        }
    }

    pub fn latest(&self) -> Option<&T> {
        self.buffer.back()
    }

    /// Oldest-first view of the current contents. The borrow pins the buffer, so
    /// the sequence never observes later appends; clone it to iterate again.
    pub fn as_sequence(&self) -> vec_deque::Iter<'_, T> {
        self.buffer.iter()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl<T: Clone> HistoryBuffer<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.buffer.iter().cloned().collect()
    }
}

impl<T> Default for HistoryBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_history_basic() {
        let mut buffer = HistoryBuffer::new(3);
        assert!(buffer.is_empty());
        assert_eq!(buffer.latest(), None);

        buffer.append(1);
        buffer.append(2);
        buffer.append(3);

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.latest(), Some(&3));
        let values: Vec<_> = buffer.as_sequence().copied().collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_history_evicts_oldest_first() {
        let mut buffer = HistoryBuffer::new(3);

        for i in 1..=4 {
            buffer.append(i);
        }
        assert_eq!(buffer.to_vec(), vec![2, 3, 4]);

        buffer.append(5);
        buffer.append(6);
        assert_eq!(buffer.to_vec(), vec![4, 5, 6]);
        assert_eq!(buffer.latest(), Some(&6));
    }

    #[test]
    fn test_length_is_min_of_appends_and_capacity() {
        for capacity in [1usize, 2, 5, 50] {
            for appends in 0..=(capacity * 2 + 1) {
                let mut buffer = HistoryBuffer::new(capacity);
                for i in 0..appends {
                    buffer.append(i);
                }

                assert_eq!(buffer.len(), appends.min(capacity));
                let expected: Vec<usize> = (appends.saturating_sub(capacity)..appends).collect();
                assert_eq!(buffer.to_vec(), expected);
                assert_eq!(buffer.capacity(), capacity);
            }
        }
    }

    #[test]
    fn test_replace_keeps_newest_entries() {
        let mut buffer = HistoryBuffer::new(3);
        buffer.append(100);

        buffer.replace(vec![1, 2, 3, 4, 5]);
        assert_eq!(buffer.to_vec(), vec![3, 4, 5]);

        buffer.replace(vec![9]);
        assert_eq!(buffer.to_vec(), vec![9]);
    }

    #[test]
    fn test_sequence_is_restartable() {
        let mut buffer = HistoryBuffer::new(4);
        buffer.append("first".to_string());
        buffer.append("second".to_string());

        let sequence = buffer.as_sequence();
        let first_pass: Vec<_> = sequence.clone().map(|s| s.as_str()).collect();
        let second_pass: Vec<_> = sequence.map(|s| s.as_str()).collect();
        assert_eq!(first_pass, vec!["first", "second"]);
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut buffer = HistoryBuffer::new(0);
        buffer.append('a');
        buffer.append('b');
        assert_eq!(buffer.to_vec(), vec!['b']);
    }
}
