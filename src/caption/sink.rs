//! Caption sinks: where deduplicated lines end up.

use crate::error::Result;
use crossbeam_channel::{Sender, TrySendError};

/// Receives caption lines from the pipeline worker.
///
/// `handle` runs on the worker thread, so implementations must not block for
/// long; a stalled sink stalls the cadence.
pub trait TextSink: Send + 'static {
    /// Process one caption line.
    fn handle(&mut self, text: &str) -> Result<()>;

    /// Called once at shutdown. May return a summary (the full transcript for
    /// collecting sinks) that the pipeline handle passes back to the caller.
    fn finish(&mut self) -> Option<String> {
        None
    }

    /// Sink name for error reporting.
    fn name(&self) -> &'static str {
        "sink"
    }
}

/// Prints caption lines to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl TextSink for StdoutSink {
    fn handle(&mut self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}

/// Collects caption lines in memory; `finish` returns them joined with
/// newlines. The test workhorse, also used for one-shot file captioning.
#[derive(Debug, Default)]
pub struct CollectorSink {
    lines: Vec<String>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl TextSink for CollectorSink {
    fn handle(&mut self, text: &str) -> Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }

    fn finish(&mut self) -> Option<String> {
        if self.lines.is_empty() {
            None
        } else {
            Some(self.lines.join("\n"))
        }
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Forwards caption lines over a channel without blocking the worker.
///
/// If the receiver falls behind the line is dropped; captions are ephemeral
/// and a stale line is worth less than a stalled pipeline.
pub struct ChannelSink {
    tx: Sender<String>,
    dropped: u64,
}

impl ChannelSink {
    pub fn new(tx: Sender<String>) -> Self {
        Self { tx, dropped: 0 }
    }

    pub fn dropped_lines(&self) -> u64 {
        self.dropped
    }
}

impl TextSink for ChannelSink {
    fn handle(&mut self, text: &str) -> Result<()> {
        match self.tx.try_send(text.to_string()) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                Ok(())
            }
        }
    }

    fn finish(&mut self) -> Option<String> {
        if self.dropped > 0 {
            Some(format!("{} caption line(s) dropped", self.dropped))
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        "channel"
    }
}
