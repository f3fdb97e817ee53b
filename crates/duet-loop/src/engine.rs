//! Contracts for the two script-engine halves driven by the loop.
//!
//! The engine is split along the worker boundary: the update worker
//! exclusively owns the [`Simulation`] half, the render worker exclusively
//! owns the [`Presentation`] half, and the `Frame` moving between them is the
//! only cross-boundary value.

use thiserror::Error;

/// Error raised by a script-engine step.
///
/// Carries the engine's own message as a `String`; concrete engines wrap
/// whatever failed on their side. The loop adds phase context when it
/// reports one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EngineError(String);

impl EngineError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Returned by [`Simulation::step`] to keep the run going or end it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Break,
}

/// Simulation half of the script engine. Produces one frame per cycle;
/// whatever state carries over between cycles stays inside the
/// implementation. Runs on the spawned update worker thread.
pub trait Simulation {
    type Frame: Send + 'static;

    /// Runs once, before either worker exists. A failure aborts the run
    /// before any thread is spawned.
    fn startup(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Produces the next frame and decides whether the run continues.
    fn step(&mut self) -> Result<(Self::Frame, LoopControl), EngineError>;
}

/// Presentation half of the script engine. Consumes one frame per cycle;
/// frame ownership ends here. Runs on the thread that called
/// [`FrameLoop::run`](crate::FrameLoop::run).
pub trait Presentation {
    type Frame;

    fn present(&mut self, frame: Self::Frame) -> Result<(), EngineError>;
}
