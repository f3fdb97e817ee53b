use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic host time in nanoseconds since an arbitrary per-clock origin.
pub trait HostClock: Send {
    fn now_ns(&self) -> u64;
}

/// Real host clock backed by [`std::time::Instant`].
///
/// The origin is the moment the clock was created; `u64` nanoseconds cover
/// centuries from there.
#[derive(Clone, Debug)]
pub struct StdHostClock {
    origin: Instant,
}

impl StdHostClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdHostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock for StdHostClock {
    fn now_ns(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}

/// Manually advanced clock for tests. Clones share the same timeline.
#[derive(Clone, Debug, Default)]
pub struct FakeHostClock {
    now_ns: Arc<AtomicU64>,
}

impl FakeHostClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ns(&self, ns: u64) {
        self.now_ns.fetch_add(ns, Ordering::SeqCst);
    }

    pub fn set_ns(&self, ns: u64) {
        self.now_ns.store(ns, Ordering::SeqCst);
    }
}

impl HostClock for FakeHostClock {
    fn now_ns(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_clock_is_monotonic() {
        let clock = StdHostClock::new();
        let a = clock.now_ns();
        let b = clock.now_ns();
        assert!(b >= a, "clock went backwards: {a} then {b}");
    }

    #[test]
    fn fake_clock_clones_share_a_timeline() {
        let clock = FakeHostClock::new();
        let other = clock.clone();
        clock.advance_ns(1_500);
        assert_eq!(other.now_ns(), 1_500);
        other.set_ns(10);
        assert_eq!(clock.now_ns(), 10);
    }
}
