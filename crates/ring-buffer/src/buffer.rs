//! Ring Buffer Implementation

use std::collections::VecDeque;

/// Fixed-capacity FIFO buffer, oldest entry evicted first
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Stored items, oldest at the front
    data: VecDeque<T>,
    /// Maximum number of items held
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer with given capacity (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push an item, returning the evicted oldest item if the buffer was full
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.data.len() >= self.capacity {
            self.data.pop_front()
        } else {
            None
        };
        self.data.push_back(item);
        evicted
    }

    /// Get the number of items currently in the buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.data.iter()
    }

    /// The last N items in insertion order (oldest first)
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &T> {
        let skip = self.data.len().saturating_sub(count);
        self.data.iter().skip(skip)
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Copy contents into a Vec, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().cloned().collect()
    }
}
