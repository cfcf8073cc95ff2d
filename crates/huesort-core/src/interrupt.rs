//! User interrupt: a shared abort token.
//!
//! The CLI raises the token from its Ctrl-C watcher. The batch loop checks it
//! between films and the HTTP layer checks it from curl's progress callback,
//! so a blocking transfer stops promptly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle to one abort flag. All clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the run stop as soon as possible.
    pub fn raise(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
