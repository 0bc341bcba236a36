//! Signal pipeline: conditioning, rolling histories, and projection.

pub mod channel_set;
pub mod conditioner;
pub mod projector;
pub mod ring_buffer;

pub use channel_set::ChannelSet;
pub use conditioner::condition;
pub use projector::{project, Trace, TraceFrame, WaveformProjector};
pub use ring_buffer::RollingChannelBuffer;
