//! Host frame timing (monotonic nanoseconds).
//!
//! [`HostClock`] abstracts the host's monotonic clock so pacing arithmetic can
//! be driven by a [`FakeHostClock`] in tests. [`FramePacer`] computes the
//! remainder-of-interval delay that keeps a presentation loop on a fixed
//! cadence; the caller does the sleeping.

mod clock;
mod pacer;

pub use clock::{FakeHostClock, HostClock, StdHostClock};
pub use pacer::FramePacer;
