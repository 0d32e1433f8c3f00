//! Fixed-capacity sliding window
//!
//! Bounded FIFO buffer of the most recent values; the oldest value is
//! evicted when a push would exceed capacity.

use std::collections::VecDeque;

/// Default number of frames retained per channel.
pub const DEFAULT_WINDOW_CAPACITY: usize = 30;

/// Bounded FIFO of the most recent values.
#[derive(Debug, Clone)]
pub struct FixedWindow<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> FixedWindow<T> {
    /// Create a window holding at most `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a value, evicting the single oldest value if the window
    /// would exceed capacity.
    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
        if self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    /// Remove all values. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate current values oldest-first without mutating the window.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True exactly when `len == capacity`.
    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Copy> FixedWindow<T> {
    /// Ordered copy of the current contents, oldest-first.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.iter().copied().collect()
    }
}

impl Default for FixedWindow<f64> {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}
