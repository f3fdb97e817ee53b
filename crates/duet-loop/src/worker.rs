//! The per-worker loops and their shutdown guard.

use std::thread;
use std::time::Duration;

use duet_time::{FramePacer, StdHostClock};
use tracing::{debug, trace, warn};

use crate::backend::PresentBackend;
use crate::barrier::FrameBarrier;
use crate::engine::{LoopControl, Presentation, Simulation};
use crate::error::LoopError;
use crate::quit::QuitSource;

/// Forces the done flag when a worker exits, so the peer can never stay
/// blocked on a dead partner. Runs on every exit path; after a normal stop
/// the flag is already set and the extra signal is a no-op.
struct DoneOnExit<'a, F> {
    barrier: &'a FrameBarrier<F>,
}

impl<F> Drop for DoneOnExit<'_, F> {
    fn drop(&mut self) {
        self.barrier.force_done();
    }
}

pub(crate) struct UpdateOutcome {
    pub frames_simulated: u64,
}

pub(crate) struct RenderOutcome {
    pub frames_presented: u64,
}

pub(crate) fn run_update<S, Q>(
    mut simulation: S,
    mut quit: Q,
    barrier: &FrameBarrier<S::Frame>,
) -> Result<UpdateOutcome, LoopError>
where
    S: Simulation,
    Q: QuitSource,
{
    let _guard = DoneOnExit { barrier };
    let mut frames_simulated = 0u64;
    loop {
        let (frame, control) = simulation.step().map_err(LoopError::Simulation)?;
        frames_simulated += 1;
        let mut stop = control == LoopControl::Break;
        if quit.quit_requested() {
            debug!("external quit requested, stopping after this frame");
            stop = true;
        }
        trace!(frame = frames_simulated, stop, "simulation step complete");
        let done = barrier.complete_update(frame, stop)?;
        if done {
            debug!(frames_simulated, "simulation worker stopping");
            return Ok(UpdateOutcome { frames_simulated });
        }
    }
}

pub(crate) fn run_render<P, B>(
    mut presentation: P,
    mut backend: B,
    barrier: &FrameBarrier<P::Frame>,
    frame_interval: Duration,
) -> Result<RenderOutcome, LoopError>
where
    P: Presentation,
    B: PresentBackend,
{
    let _guard = DoneOnExit { barrier };
    let mut pacer = FramePacer::new(StdHostClock::new(), frame_interval);
    let mut frames_presented = 0u64;
    loop {
        let handoff = barrier.await_frame(false)?;
        if let Some(frame) = handoff.frame {
            presentation.present(frame).map_err(LoopError::Presentation)?;
            frames_presented += 1;
            if let Err(err) = backend.swap_buffers() {
                warn!(%err, "buffer swap failed; continuing");
            }
        }
        if handoff.done {
            debug!(frames_presented, "presentation worker stopping");
            return Ok(RenderOutcome { frames_presented });
        }
        thread::sleep(pacer.next_delay());
    }
}
