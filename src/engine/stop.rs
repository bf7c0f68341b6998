//! Cooperative stop flag shared between the caller and a running engine

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const IDLE: u8 = 0;
const ARMED: u8 = 1;
const STOPPING: u8 = 2;

/// Cloneable handle used to ask a run to stop.
///
/// Requests only count once the engine has armed the handle at the start of
/// `run`; anything earlier is dropped, and nothing after arming can be lost.
/// The engine polls it once per file, before touching the file; a copy in
/// progress always finishes.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    state: Arc<AtomicU8>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop at the next file boundary. Safe from any thread.
    pub fn request_stop(&self) {
        let _ = self
            .state
            .compare_exchange(ARMED, STOPPING, Ordering::AcqRel, Ordering::Acquire);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.state.load(Ordering::Acquire) == STOPPING
    }

    /// Start accepting stop requests
    pub(crate) fn arm(&self) {
        self.state.store(ARMED, Ordering::Release);
    }
}
