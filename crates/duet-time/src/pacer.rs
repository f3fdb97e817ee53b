use std::time::Duration;

use crate::HostClock;

/// Computes how long the presentation worker should sleep after each frame to
/// hold a fixed target interval.
///
/// The pacer only does the arithmetic; the caller sleeps. A frame that
/// overruns its slot restarts the cadence from now instead of accumulating
/// debt. A zero interval disables pacing.
#[derive(Debug)]
pub struct FramePacer<C> {
    clock: C,
    interval_ns: u64,
    next_deadline_ns: u64,
}

impl<C: HostClock> FramePacer<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        let interval_ns = interval.as_nanos() as u64;
        let next_deadline_ns = clock.now_ns().saturating_add(interval_ns);
        Self {
            clock,
            interval_ns,
            next_deadline_ns,
        }
    }

    /// Remaining time in the current frame slot. Advances the deadline to the
    /// next slot, so call it exactly once per frame.
    pub fn next_delay(&mut self) -> Duration {
        if self.interval_ns == 0 {
            return Duration::ZERO;
        }
        let now = self.clock.now_ns();
        let delay_ns = self.next_deadline_ns.saturating_sub(now);
        self.next_deadline_ns = if delay_ns == 0 {
            now.saturating_add(self.interval_ns)
        } else {
            self.next_deadline_ns.saturating_add(self.interval_ns)
        };
        Duration::from_nanos(delay_ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FakeHostClock;

    const MS: u64 = 1_000_000;

    fn pacer_with_interval_ms(interval_ms: u64) -> (FakeHostClock, FramePacer<FakeHostClock>) {
        let clock = FakeHostClock::new();
        let pacer = FramePacer::new(clock.clone(), Duration::from_millis(interval_ms));
        (clock, pacer)
    }

    #[test]
    fn sleeps_for_the_remainder_of_the_interval() {
        let (clock, mut pacer) = pacer_with_interval_ms(16);

        // Frame work used 4ms of the 16ms slot.
        clock.advance_ns(4 * MS);
        assert_eq!(pacer.next_delay(), Duration::from_millis(12));
    }

    #[test]
    fn keeps_cadence_across_consecutive_frames() {
        let (clock, mut pacer) = pacer_with_interval_ms(10);

        clock.advance_ns(3 * MS);
        assert_eq!(pacer.next_delay(), Duration::from_millis(7));

        // Slept out the slot, then the next frame used 2ms.
        clock.advance_ns(7 * MS);
        clock.advance_ns(2 * MS);
        assert_eq!(pacer.next_delay(), Duration::from_millis(8));
    }

    #[test]
    fn overrun_restarts_the_cadence_from_now() {
        let (clock, mut pacer) = pacer_with_interval_ms(10);

        // One frame blew through two and a half slots.
        clock.advance_ns(25 * MS);
        assert_eq!(pacer.next_delay(), Duration::ZERO);

        // The next deadline counts from the overrun point, not the old grid.
        clock.advance_ns(4 * MS);
        assert_eq!(pacer.next_delay(), Duration::from_millis(6));
    }

    #[test]
    fn zero_interval_never_sleeps() {
        let (clock, mut pacer) = pacer_with_interval_ms(0);

        assert_eq!(pacer.next_delay(), Duration::ZERO);
        clock.advance_ns(123 * MS);
        assert_eq!(pacer.next_delay(), Duration::ZERO);
    }
}
