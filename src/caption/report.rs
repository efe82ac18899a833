//! Error reporting for the pipeline worker.
//!
//! Everything that goes wrong inside the caption loop is recoverable; the
//! reporter decides where those errors end up (stderr in production, a vec in
//! tests).

use crate::error::LivecapError;
use std::sync::{Arc, Mutex};

/// Receives non-fatal errors from pipeline stages.
pub trait ErrorReporter: Send + Sync {
    /// Reports an error from the named stage ("transcribe", "sink", "source").
    fn report(&self, stage: &str, error: &LivecapError);
}

/// Reporter that logs to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, stage: &str, error: &LivecapError) {
        eprintln!("livecap [{}]: {}", stage, error);
    }
}

/// Reporter that collects errors for inspection in tests.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    entries: Arc<Mutex<Vec<(String, String)>>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// (stage, message) pairs reported so far.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, stage: &str, error: &LivecapError) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((stage.to_string(), error.to_string()));
    }
}
