//! Backoff delay abstraction
//!
//! The fetcher waits between attempts through [`Delay`] so the timing policy
//! can be exercised without real sleeping.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Something that can wait for a duration
pub trait Delay: Send + Sync + 'static {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Real delay backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

impl Delay for TokioDelay {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Delay that returns immediately and remembers every requested duration
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    calls: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far, in call order
    pub fn calls(&self) -> Vec<Duration> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Delay for RecordingDelay {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(duration);
        std::future::ready(())
    }
}
