//! External termination input.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Source of an externally requested stop (OS signal, window close, test
/// harness). The update worker polls it once per cycle and ORs the result
/// into its stop decision.
pub trait QuitSource {
    fn quit_requested(&mut self) -> bool;
}

/// Quit source that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverQuit;

impl QuitSource for NeverQuit {
    fn quit_requested(&mut self) -> bool {
        false
    }
}

/// Clonable atomic quit flag. Any clone can request the stop, which makes it
/// suitable for signal handlers and tests; once requested it stays set.
#[derive(Debug, Clone, Default)]
pub struct SharedQuitFlag {
    requested: Arc<AtomicBool>,
}

impl SharedQuitFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_quit(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

impl QuitSource for SharedQuitFlag {
    fn quit_requested(&mut self) -> bool {
        self.is_requested()
    }
}
