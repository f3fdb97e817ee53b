//! Run-level errors.

use thiserror::Error;

use crate::barrier::BarrierError;
use crate::engine::EngineError;

pub type Result<T> = std::result::Result<T, LoopError>;

/// Fatal run failure. Ignorable conditions (buffer-swap failures) are logged
/// by the render worker and never reach this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoopError {
    /// Engine startup failed; no worker was started.
    #[error("engine startup failed: {0}")]
    Startup(EngineError),

    #[error("error while running simulation step: {0}")]
    Simulation(EngineError),

    #[error("error while running presentation step: {0}")]
    Presentation(EngineError),

    /// The rendezvous state is unrecoverable.
    #[error(transparent)]
    Barrier(#[from] BarrierError),

    /// The simulation worker died without reporting an error.
    #[error("simulation worker panicked")]
    WorkerPanicked,
}
