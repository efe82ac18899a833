//! Audio frames and the capture-to-pipeline queue.
//!
//! The queue is bounded with a drop-oldest overflow policy: if the pipeline
//! stalls (slow transcription), the producer evicts the oldest frame and keeps
//! pushing. Memory stays bounded and the backlog stays fresh.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A chunk of interleaved samples as delivered by a capture callback.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    /// Interleaved f32 samples, normalized to [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Channel count of the interleaved data.
    pub channels: u16,
}

impl AudioFrame {
    pub fn new(samples: Vec<f32>, channels: u16) -> Self {
        Self { samples, channels }
    }

    /// Mono convenience constructor for tests and file sources.
    pub fn mono(samples: Vec<f32>) -> Self {
        Self {
            samples,
            channels: 1,
        }
    }

    /// Number of sample points per channel.
    pub fn len_per_channel(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }
}

/// Create a bounded frame queue with drop-oldest overflow.
pub fn frame_queue(capacity: usize) -> (FrameProducer, FrameConsumer) {
    let (tx, rx) = bounded(capacity);
    let dropped = Arc::new(AtomicU64::new(0));
    (
        FrameProducer {
            tx,
            rx: rx.clone(),
            dropped: Arc::clone(&dropped),
        },
        FrameConsumer { rx, dropped },
    )
}

/// Producer half, held by the capture callback.
///
/// Dropping the last clone disconnects the channel, which is how finite
/// sources signal end-of-input to the pipeline.
#[derive(Clone)]
pub struct FrameProducer {
    tx: Sender<AudioFrame>,
    rx: Receiver<AudioFrame>,
    dropped: Arc<AtomicU64>,
}

impl FrameProducer {
    /// Push a frame, evicting the oldest frame if the queue is full.
    ///
    /// Never blocks. If the consumer is gone the frame is discarded silently
    /// (shutdown is in progress).
    pub fn push(&self, frame: AudioFrame) {
        let mut frame = frame;
        loop {
            match self.tx.try_send(frame) {
                Ok(()) => return,
                Err(TrySendError::Full(returned)) => {
                    if self.rx.try_recv().is_ok() {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    frame = returned;
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }

    /// Blocking push for non-real-time sources (files).
    ///
    /// Waits for queue space instead of evicting, so no audio is lost. A
    /// dropped consumer ends the wait silently.
    pub fn send(&self, frame: AudioFrame) {
        self.tx.send(frame).ok();
    }

    /// Total frames evicted due to overflow.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Consumer half, held by the pipeline worker.
pub struct FrameConsumer {
    rx: Receiver<AudioFrame>,
    dropped: Arc<AtomicU64>,
}

impl FrameConsumer {
    /// Wait up to `timeout` for the next frame.
    ///
    /// `Err(Disconnected)` means every producer has been dropped.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> std::result::Result<AudioFrame, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Frames currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Total frames evicted due to overflow.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
