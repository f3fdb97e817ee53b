//! Presentation backend seam.

use thiserror::Error;

/// Buffer-swap failure. The render worker logs these and keeps going; a
/// failed swap must never desynchronize the handshake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PresentError(String);

impl PresentError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Makes the most recently presented frame visible, once per render cycle.
pub trait PresentBackend {
    fn swap_buffers(&mut self) -> Result<(), PresentError>;
}
