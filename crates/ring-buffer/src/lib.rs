//! Bounded Rolling History
//!
//! Provides a fixed-capacity FIFO buffer for per-frame samples. When the
//! buffer is full the oldest entry is evicted on every push.

mod buffer;

pub use buffer::RingBuffer;
