//! The audio source abstraction and its mock implementation.

use crate::audio::frame::{AudioFrame, FrameProducer};
use crate::error::{LivecapError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A push-model audio source.
///
/// `start` hands the source a [`FrameProducer`]; the source delivers frames
/// to it from its own thread (cpal callback, file reader) until `stop` is
/// called or the input runs out. Implementations must keep per-frame work on
/// the delivery thread to a copy and an enqueue.
pub trait AudioSource: Send {
    /// Begin delivering frames to `producer`.
    fn start(&mut self, producer: FrameProducer) -> Result<()>;

    /// Stop delivering frames. Idempotent.
    fn stop(&mut self) -> Result<()>;

    /// Finite sources (files) drop their producer at end of input, which the
    /// pipeline treats as a flush-and-exit signal.
    fn is_finite(&self) -> bool {
        false
    }
}

/// An input device as shown by `livecap devices`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    /// Position in the enumeration order; what `--device <index>` selects.
    pub index: usize,
    pub name: String,
    pub max_channels: u16,
    /// True for the device picked when no selection is given.
    pub recommended: bool,
}

/// Mock audio source for testing.
///
/// Delivers a scripted list of frames synchronously on `start` and then holds
/// the producer open (or drops it, when built with [`MockAudioSource::finite`])
/// so tests can exercise both live and end-of-input behavior.
pub struct MockAudioSource {
    frames: Vec<AudioFrame>,
    fail_start: bool,
    error_message: String,
    finite: bool,
    producer: Option<FrameProducer>,
    started: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl MockAudioSource {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            fail_start: false,
            error_message: "mock audio failure".to_string(),
            finite: false,
            producer: None,
            started: Arc::new(AtomicBool::new(false)),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Frames to deliver on start.
    pub fn with_frames(mut self, frames: Vec<AudioFrame>) -> Self {
        self.frames = frames;
        self
    }

    /// Convenience: a single mono frame.
    pub fn with_mono_samples(mut self, samples: Vec<f32>) -> Self {
        self.frames = vec![AudioFrame::mono(samples)];
        self
    }

    /// Make `start` fail.
    pub fn with_start_failure(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    /// Drop the producer after delivering the frames, signalling end-of-input.
    pub fn finite(mut self) -> Self {
        self.finite = true;
        self
    }

    /// Shared flag set when `start` succeeds. Survives moving the source into
    /// a pipeline.
    pub fn started_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.started)
    }

    /// Shared flag set when `stop` is called.
    pub fn stopped_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stopped)
    }
}

impl Default for MockAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for MockAudioSource {
    fn start(&mut self, producer: FrameProducer) -> Result<()> {
        if self.fail_start {
            return Err(LivecapError::AudioCapture {
                message: self.error_message.clone(),
            });
        }
        for frame in self.frames.drain(..) {
            producer.push(frame);
        }
        if !self.finite {
            self.producer = Some(producer);
        }
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.producer = None;
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_finite(&self) -> bool {
        self.finite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::frame::frame_queue;
    use crossbeam_channel::RecvTimeoutError;
    use std::time::Duration;

    #[test]
    fn mock_delivers_scripted_frames() {
        let (producer, consumer) = frame_queue(8);
        let mut source = MockAudioSource::new().with_frames(vec![
            AudioFrame::mono(vec![0.1, 0.2]),
            AudioFrame::mono(vec![0.3]),
        ]);

        source.start(producer).unwrap();

        let first = consumer.recv_timeout(Duration::from_millis(10)).unwrap();
        assert_eq!(first.samples, vec![0.1, 0.2]);
        let second = consumer.recv_timeout(Duration::from_millis(10)).unwrap();
        assert_eq!(second.samples, vec![0.3]);
    }

    #[test]
    fn mock_start_failure_returns_error() {
        let (producer, _consumer) = frame_queue(8);
        let mut source = MockAudioSource::new()
            .with_start_failure()
            .with_error_message("device unplugged");

        let err = source.start(producer).unwrap_err();
        match err {
            LivecapError::AudioCapture { message } => assert_eq!(message, "device unplugged"),
            other => panic!("expected AudioCapture, got {:?}", other),
        }
        assert!(!source.started_flag().load(Ordering::SeqCst));
    }

    #[test]
    fn infinite_mock_keeps_channel_open_until_stop() {
        let (producer, consumer) = frame_queue(8);
        let mut source = MockAudioSource::new().with_mono_samples(vec![0.5]);

        source.start(producer).unwrap();
        consumer.recv_timeout(Duration::from_millis(10)).unwrap();

        // Producer is held by the source, so the queue only times out.
        assert_eq!(
            consumer.recv_timeout(Duration::from_millis(10)),
            Err(RecvTimeoutError::Timeout)
        );

        source.stop().unwrap();
        assert_eq!(
            consumer.recv_timeout(Duration::from_millis(10)),
            Err(RecvTimeoutError::Disconnected)
        );
    }

    #[test]
    fn finite_mock_disconnects_after_delivery() {
        let (producer, consumer) = frame_queue(8);
        let mut source = MockAudioSource::new()
            .with_mono_samples(vec![0.5])
            .finite();
        assert!(source.is_finite());

        source.start(producer).unwrap();
        consumer.recv_timeout(Duration::from_millis(10)).unwrap();
        assert_eq!(
            consumer.recv_timeout(Duration::from_millis(10)),
            Err(RecvTimeoutError::Disconnected)
        );
    }

    #[test]
    fn flags_observable_after_move() {
        let source = MockAudioSource::new();
        let started = source.started_flag();
        let stopped = source.stopped_flag();

        let mut boxed: Box<dyn AudioSource> = Box::new(source);
        let (producer, _consumer) = frame_queue(4);
        boxed.start(producer).unwrap();
        boxed.stop().unwrap();

        assert!(started.load(Ordering::SeqCst));
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut source = MockAudioSource::new();
        assert!(source.stop().is_ok());
        assert!(source.stop().is_ok());
    }
}
