//! The coordinator: owns both engine halves, runs the two workers, and
//! assembles the run summary.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::backend::PresentBackend;
use crate::barrier::FrameBarrier;
use crate::engine::{Presentation, Simulation};
use crate::error::{LoopError, Result};
use crate::quit::QuitSource;
use crate::worker;

/// Tuning for a run.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Target wall-clock interval between presented frames. Zero disables
    /// pacing.
    pub frame_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_simulated: u64,
    pub frames_presented: u64,
    pub wall_time: Duration,
}

/// Two-worker frame loop.
///
/// [`FrameLoop::run`] consumes the loop, runs engine startup, drives the
/// simulation worker on a spawned thread and the presentation worker on the
/// calling thread, and returns once both have stopped. All owned resources
/// are released in reverse order of acquisition on every exit path.
pub struct FrameLoop<S, P, B, Q> {
    simulation: S,
    presentation: P,
    backend: B,
    quit: Q,
    config: LoopConfig,
}

impl<S, P, B, Q> FrameLoop<S, P, B, Q>
where
    S: Simulation + Send + 'static,
    P: Presentation<Frame = S::Frame>,
    B: PresentBackend,
    Q: QuitSource + Send + 'static,
{
    pub fn new(simulation: S, presentation: P, backend: B, quit: Q, config: LoopConfig) -> Self {
        Self {
            simulation,
            presentation,
            backend,
            quit,
            config,
        }
    }

    pub fn run(self) -> Result<RunSummary> {
        let FrameLoop {
            mut simulation,
            presentation,
            backend,
            quit,
            config,
        } = self;

        let started = Instant::now();
        simulation.startup().map_err(LoopError::Startup)?;

        let barrier = Arc::new(FrameBarrier::new());
        let update_barrier = Arc::clone(&barrier);
        let update =
            thread::spawn(move || worker::run_update(simulation, quit, &update_barrier));

        let render_result = worker::run_render(
            presentation,
            backend,
            &barrier,
            config.frame_interval,
        );

        let update_result = match update.join() {
            Ok(result) => result,
            Err(_) => Err(LoopError::WorkerPanicked),
        };

        match (update_result, render_result) {
            (Ok(update), Ok(render)) => {
                let summary = RunSummary {
                    frames_simulated: update.frames_simulated,
                    frames_presented: render.frames_presented,
                    wall_time: started.elapsed(),
                };
                debug!(
                    frames_simulated = summary.frames_simulated,
                    frames_presented = summary.frames_presented,
                    "run complete"
                );
                Ok(summary)
            }
            (Err(update_err), Err(render_err)) => {
                // The simulation failure is upstream of whatever the
                // presentation side saw; report that one.
                error!(%render_err, "presentation worker also failed");
                Err(update_err)
            }
            (Err(update_err), Ok(_)) => Err(update_err),
            (Ok(_), Err(render_err)) => Err(render_err),
        }
    }
}
