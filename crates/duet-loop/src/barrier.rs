//! Two-party rendezvous barrier with a single-slot frame mailbox.
//!
//! Both workers arrive once per cycle. Whichever side arrives first blocks
//! until its peer catches up; the frame deposited by the simulation side is
//! drained by the presentation side while the lock is held, so the frame has
//! exactly one owner at every instant. The done flag is sticky and merged at
//! every arrival, and substitutes for the arrival of a peer that died.

#[cfg(all(feature = "loom", test))]
use loom::sync::{Condvar, Mutex};
#[cfg(not(all(feature = "loom", test)))]
use std::sync::{Condvar, Mutex};

use thiserror::Error;

/// Fatal synchronization failure. There is no safe recovery state after one
/// of these; callers abort the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BarrierError {
    /// A worker panicked while holding the barrier lock.
    #[error("frame barrier lock poisoned by a worker panic")]
    Poisoned,
    /// A side arrived again before its previous handshake completed.
    #[error("frame barrier handshake out of sync")]
    OutOfSync,
}

/// Which side arrived first in the current cycle, if either.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Turn {
    Neither,
    UpdateFirst,
    RenderFirst,
}

struct Shared<F> {
    turn: Turn,
    done: bool,
    slot: Option<F>,
}

/// Outcome of a presentation-side arrival. `frame` is absent only when the
/// simulation worker died without depositing one; `done` is the merged stop
/// flag.
#[derive(Debug, PartialEq, Eq)]
pub struct FrameHandoff<F> {
    pub frame: Option<F>,
    pub done: bool,
}

/// The rendezvous point between the simulation and presentation workers.
///
/// Per cycle, the simulation side calls [`FrameBarrier::complete_update`]
/// exactly once and the presentation side calls [`FrameBarrier::await_frame`]
/// exactly once. Neither side's cycle N+1 call returns before the other
/// side's cycle N call has arrived.
pub struct FrameBarrier<F> {
    shared: Mutex<Shared<F>>,
    arrived: Condvar,
}

impl<F> FrameBarrier<F> {
    pub fn new() -> Self {
        Self {
            shared: Mutex::new(Shared {
                turn: Turn::Neither,
                done: false,
                slot: None,
            }),
            arrived: Condvar::new(),
        }
    }

    /// Simulation-side arrival: deposits `frame` for the presentation side
    /// and merges `done`. Blocks until the presentation side arrives, unless
    /// the run is already shutting down. Returns the merged done flag; once
    /// it is true the caller must stop arriving.
    pub fn complete_update(&self, frame: F, done: bool) -> Result<bool, BarrierError> {
        let mut shared = self.shared.lock().map_err(|_| BarrierError::Poisoned)?;
        if shared.turn == Turn::UpdateFirst {
            return Err(BarrierError::OutOfSync);
        }
        // The presentation side drains the slot just after waking; a fast
        // simulation cycle can arrive before that has happened.
        while shared.slot.is_some() && !shared.done {
            shared = self.arrived.wait(shared).map_err(|_| BarrierError::Poisoned)?;
        }
        shared.done |= done;
        if shared.slot.is_some() {
            // Shutdown raced the deposit; nobody is left to drain the slot.
            return Ok(true);
        }
        shared.slot = Some(frame);
        if shared.turn == Turn::RenderFirst {
            // Second arrival of the cycle: the presentation side is waiting.
            shared.turn = Turn::Neither;
            self.arrived.notify_one();
        } else {
            shared.turn = Turn::UpdateFirst;
            while shared.turn == Turn::UpdateFirst && !shared.done {
                shared = self.arrived.wait(shared).map_err(|_| BarrierError::Poisoned)?;
            }
        }
        Ok(shared.done)
    }

    /// Presentation-side arrival: blocks until the simulation side has
    /// deposited this cycle's frame, then drains it. `done` is merged into
    /// the shared flag, so a fatal presentation failure can be propagated
    /// through a final arrival.
    pub fn await_frame(&self, done: bool) -> Result<FrameHandoff<F>, BarrierError> {
        let mut shared = self.shared.lock().map_err(|_| BarrierError::Poisoned)?;
        if shared.turn == Turn::RenderFirst {
            return Err(BarrierError::OutOfSync);
        }
        shared.done |= done;
        if shared.turn == Turn::UpdateFirst {
            // Second arrival of the cycle: the simulation side is waiting.
            shared.turn = Turn::Neither;
        } else {
            shared.turn = Turn::RenderFirst;
            while shared.turn == Turn::RenderFirst && !shared.done {
                shared = self.arrived.wait(shared).map_err(|_| BarrierError::Poisoned)?;
            }
        }
        let frame = shared.slot.take();
        // Wakes a simulation side blocked on the handshake or on a full slot.
        self.arrived.notify_one();
        Ok(FrameHandoff {
            frame,
            done: shared.done,
        })
    }

    /// Shutdown signal for a worker that is unwinding: forces the done flag
    /// and wakes any waiter so the peer cannot block on a dead partner. Runs
    /// even when the unwinding panic poisoned the lock.
    pub(crate) fn force_done(&self) {
        let mut shared = match self.shared.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        shared.done = true;
        self.arrived.notify_all();
    }
}

impl<F> Default for FrameBarrier<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn alternating_cycles_deliver_every_frame_in_order() {
        let barrier = Arc::new(FrameBarrier::new());

        let update_barrier = Arc::clone(&barrier);
        let update = thread::spawn(move || {
            for n in 1..=100u32 {
                let done = update_barrier
                    .complete_update(n, n == 100)
                    .expect("update arrival failed");
                assert_eq!(done, n == 100, "done flag set before the final frame");
            }
        });

        let mut seen = Vec::new();
        loop {
            let handoff = barrier.await_frame(false).expect("render arrival failed");
            if let Some(frame) = handoff.frame {
                seen.push(frame);
            }
            if handoff.done {
                break;
            }
        }
        update.join().expect("update thread panicked");

        assert_eq!(seen, (1..=100).collect::<Vec<_>>());
    }

    #[test]
    fn final_arrival_with_done_does_not_block_without_a_peer() {
        let barrier = FrameBarrier::new();

        assert_eq!(barrier.complete_update(9u32, true), Ok(true));

        let handoff = barrier.await_frame(false).expect("render arrival failed");
        assert_eq!(handoff.frame, Some(9));
        assert!(handoff.done, "final handoff should carry the done flag");
    }

    #[test]
    fn render_side_done_is_merged_into_the_handshake() {
        let barrier = Arc::new(FrameBarrier::new());

        let update_barrier = Arc::clone(&barrier);
        let update = thread::spawn(move || update_barrier.complete_update(5u32, false));

        // If the render side wins the race the frame may legitimately be
        // absent (done short-circuits the wait), but the merged flag must be
        // visible on both sides either way.
        let handoff = barrier.await_frame(true).expect("render arrival failed");
        assert!(handoff.done);
        if let Some(frame) = handoff.frame {
            assert_eq!(frame, 5);
        }

        let done = update.join().expect("update thread panicked");
        assert_eq!(done, Ok(true), "update side must observe the merged flag");
    }

    #[test]
    fn force_done_releases_a_waiting_render_side() {
        let barrier = Arc::new(FrameBarrier::<u32>::new());

        let render_barrier = Arc::clone(&barrier);
        let render = thread::spawn(move || render_barrier.await_frame(false));

        // Give the render side a moment to block, then pull the plug.
        thread::sleep(Duration::from_millis(20));
        barrier.force_done();

        let handoff = render
            .join()
            .expect("render thread panicked")
            .expect("render arrival failed");
        assert_eq!(handoff.frame, None);
        assert!(handoff.done);
    }

    #[test]
    fn force_done_releases_a_waiting_update_side() {
        let barrier = Arc::new(FrameBarrier::new());

        let update_barrier = Arc::clone(&barrier);
        let update = thread::spawn(move || update_barrier.complete_update(1u32, false));

        thread::sleep(Duration::from_millis(20));
        barrier.force_done();

        let done = update.join().expect("update thread panicked");
        assert_eq!(done, Ok(true));
    }

    #[test]
    fn repeated_arrival_without_a_completed_handshake_is_rejected() {
        let barrier = FrameBarrier::new();

        assert_eq!(barrier.complete_update(1u32, true), Ok(true));
        assert_eq!(
            barrier.complete_update(2u32, true),
            Err(BarrierError::OutOfSync)
        );

        let handoff = barrier.await_frame(false).expect("render arrival failed");
        assert_eq!(handoff.frame, Some(1), "first deposit must survive intact");

        // With the run done and no deposit pending this arrival drains
        // nothing, and a further one is a protocol violation.
        let handoff = barrier.await_frame(false).expect("render arrival failed");
        assert_eq!(handoff.frame, None);
        assert!(handoff.done);
        assert_eq!(barrier.await_frame(false), Err(BarrierError::OutOfSync));
    }
}
