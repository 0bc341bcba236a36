//! Fixed-capacity rolling history for a single channel.
//!
//! A [`RollingChannelBuffer`] always holds exactly `capacity` samples, ordered
//! oldest-first. New buffers and resets are zero-filled, so a freshly started
//! trace is a flat line at the baseline rather than an empty canvas.
//!
//! # Resizing
//!
//! Capacity follows the canvas width. A resize never rebuilds the history:
//! shrinking trims the oldest samples and growing pads zeros in front of them.
//! The retained samples keep their relative order, which is what lets a live
//! trace survive a window resize without a visible jump.

use std::collections::VecDeque;

/// A FIFO sample history whose length always equals its capacity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RollingChannelBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl RollingChannelBuffer {
    /// Create a zero-filled buffer of the given capacity.
    pub fn new(capacity: usize) -> Self {
        let mut buffer = Self::default();
        buffer.reset(capacity);
        buffer
    }

    /// Current capacity (and therefore length).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored samples. Equal to [`capacity`](Self::capacity).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True only for a zero-capacity buffer.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recently pushed sample, if any.
    pub fn newest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    /// Append `value` as the newest sample, dropping the oldest when full.
    ///
    /// A zero-capacity buffer ignores the push.
    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Change capacity while keeping the newest samples in order.
    ///
    /// Shrinking drops samples from the oldest end; growing inserts zeros at
    /// the oldest end.
    pub fn resize(&mut self, new_capacity: usize) {
        while self.samples.len() > new_capacity {
            self.samples.pop_front();
        }
        if self.samples.len() < new_capacity {
            let missing = new_capacity - self.samples.len();
            self.samples.reserve(missing);
            for _ in 0..missing {
                self.samples.push_front(0.0);
            }
        }
        self.capacity = new_capacity;
    }

    /// Replace the contents with `capacity` zeros.
    pub fn reset(&mut self, capacity: usize) {
        self.samples.clear();
        self.samples.resize(capacity, 0.0);
        self.capacity = capacity;
    }

    /// Copy of the history, oldest first.
    pub fn snapshot(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    /// Borrowing iterator over the history, oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}
