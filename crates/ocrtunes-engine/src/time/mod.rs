//! Frame timing.
//!
//! One [`FramePacer`] per window decides when the next fixed-rate frame is due
//! and measures the step between presented frames.

mod pacer;

pub use pacer::FramePacer;
