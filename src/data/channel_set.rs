//! The four channel histories kept in lock-step.

use crate::core::{Channel, ConditionedSample};
use crate::data::ring_buffer::RollingChannelBuffer;

/// One [`RollingChannelBuffer`] per [`Channel`], all at the same capacity.
///
/// Every operation touches the buffers in [`Channel::ALL`] order and completes
/// before returning, so index `i` always refers to the same instant in every
/// channel.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelSet {
    buffers: [RollingChannelBuffer; 4],
}

impl ChannelSet {
    /// Create four zero-filled buffers of `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffers: std::array::from_fn(|_| RollingChannelBuffer::new(capacity)),
        }
    }

    /// Shared capacity of all four buffers.
    pub fn capacity(&self) -> usize {
        self.buffers[0].capacity()
    }

    /// History of one channel.
    pub fn buffer(&self, channel: Channel) -> &RollingChannelBuffer {
        &self.buffers[channel.index()]
    }

    /// Push each field of `sample` into its channel.
    pub fn push_all(&mut self, sample: &ConditionedSample) {
        for channel in Channel::ALL {
            self.buffers[channel.index()].push(sample.value(channel));
        }
    }

    /// Resize every buffer, preserving the newest samples.
    pub fn resize_all(&mut self, capacity: usize) {
        for buffer in &mut self.buffers {
            buffer.resize(capacity);
        }
    }

    /// Zero every buffer at `capacity`.
    pub fn reset_all(&mut self, capacity: usize) {
        for buffer in &mut self.buffers {
            buffer.reset(capacity);
        }
    }

    /// Whether all four buffers currently have the same length.
    pub fn is_aligned(&self) -> bool {
        let len = self.buffers[0].len();
        self.buffers.iter().all(|b| b.len() == len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(m: f64, x: f64, y: f64, z: f64) -> ConditionedSample {
        ConditionedSample {
            axis_x: x,
            axis_y: y,
            axis_z: z,
            magnitude_delta: m,
        }
    }

    #[test]
    fn test_push_routes_fields_to_channels() {
        let mut set = ChannelSet::new(3);
        set.push_all(&sample(0.5, 1.0, -1.0, 2.0));

        assert_eq!(set.buffer(Channel::Magnitude).snapshot(), vec![0.0, 0.0, 0.5]);
        assert_eq!(set.buffer(Channel::AxisX).snapshot(), vec![0.0, 0.0, 1.0]);
        assert_eq!(set.buffer(Channel::AxisY).snapshot(), vec![0.0, 0.0, -1.0]);
        assert_eq!(set.buffer(Channel::AxisZ).snapshot(), vec![0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_buffers_stay_aligned() {
        let mut set = ChannelSet::new(64);
        assert!(set.is_aligned());

        for i in 0..100 {
            set.push_all(&sample(i as f64, 0.0, 0.0, 0.0));
            assert!(set.is_aligned());
        }

        for capacity in [10, 200, 64] {
            set.resize_all(capacity);
            assert!(set.is_aligned());
            assert_eq!(set.capacity(), capacity);
        }

        set.reset_all(32);
        assert!(set.is_aligned());
        assert_eq!(set.capacity(), 32);
        for channel in Channel::ALL {
            assert!(set.buffer(channel).iter().all(|v| v == 0.0));
        }
    }

    #[test]
    fn test_resize_preserves_cross_channel_alignment() {
        let mut set = ChannelSet::new(4);
        for i in 1..=4 {
            let v = i as f64;
            set.push_all(&sample(v, v * 10.0, v * 100.0, v * 1000.0));
        }
        set.resize_all(2);

        assert_eq!(set.buffer(Channel::Magnitude).snapshot(), vec![3.0, 4.0]);
        assert_eq!(set.buffer(Channel::AxisX).snapshot(), vec![30.0, 40.0]);
        assert_eq!(set.buffer(Channel::AxisY).snapshot(), vec![300.0, 400.0]);
        assert_eq!(set.buffer(Channel::AxisZ).snapshot(), vec![3000.0, 4000.0]);
    }

    #[test]
    fn test_resize_to_huge_canvas_capacity() {
        use crate::core::{CanvasGeometry, MAX_CAPACITY};

        let capacity = CanvasGeometry::new(1.0e300, 200.0).capacity();
        assert_eq!(capacity, MAX_CAPACITY);

        let mut set = ChannelSet::new(64);
        set.push_all(&sample(0.7, 0.1, 0.2, 0.3));
        set.resize_all(capacity);
        assert!(set.is_aligned());
        assert_eq!(set.capacity(), MAX_CAPACITY);
        assert_eq!(set.buffer(Channel::Magnitude).newest(), Some(0.7));
    }
}
