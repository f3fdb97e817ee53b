//! Two-worker frame loop: a simulation worker and a presentation worker in
//! strict alternation, exchanging exclusive ownership of one frame value per
//! cycle through a rendezvous barrier.
//!
//! The presentation of frame N overlaps the simulation of frame N+1, but
//! neither worker's next cycle begins before both have completed the current
//! handshake, so presentation always observes a complete frame and
//! simulation never overwrites one still being read. Termination is
//! cooperative: a stop requested on the simulation side (script end or
//! external quit) still has its final frame presented once before the run
//! ends.
//!
//! [`FrameLoop`] wires the pieces together; [`FrameBarrier`] is the
//! underlying rendezvous primitive for callers that build their own loops.

mod backend;
mod barrier;
mod engine;
mod error;
mod quit;
mod runner;
mod worker;

pub use backend::{PresentBackend, PresentError};
pub use barrier::{BarrierError, FrameBarrier, FrameHandoff};
pub use engine::{EngineError, LoopControl, Presentation, Simulation};
pub use error::{LoopError, Result};
pub use quit::{NeverQuit, QuitSource, SharedQuitFlag};
pub use runner::{FrameLoop, LoopConfig, RunSummary};
