//! The transcription engine seam.
//!
//! The pipeline treats the engine as a black box behind [`Transcriber`]; the
//! real implementation is [`crate::stt::whisper::WhisperTranscriber`], tests
//! use [`MockTranscriber`].

use crate::error::{LivecapError, Result};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Converts a window of audio into text.
///
/// Implementations take mono f32 samples in [-1.0, 1.0] at the configured
/// sample rate. Calls come from the pipeline worker thread; `&self` because
/// the engine is shared behind an `Arc`.
pub trait Transcriber: Send + Sync {
    /// Transcribe one window of audio.
    ///
    /// # Errors
    /// Inference failures; the pipeline treats them as non-fatal.
    fn transcribe(&self, audio: &[f32]) -> Result<String>;

    /// Name of the loaded model.
    fn model_name(&self) -> &str;

    /// Whether the engine can actually transcribe.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Allow sharing one engine across pipelines.
impl<T: Transcriber + ?Sized> Transcriber for Arc<T> {
    fn transcribe(&self, audio: &[f32]) -> Result<String> {
        (**self).transcribe(audio)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Scriptable engine for tests.
///
/// Returns queued responses in order, then repeats the last one; counts calls
/// and optionally captures the audio it was handed.
#[derive(Debug, Default)]
pub struct MockTranscriber {
    responses: Mutex<VecDeque<String>>,
    fallback: Mutex<String>,
    should_fail: bool,
    error_message: Option<String>,
    calls: AtomicUsize,
    capture: bool,
    captured: Mutex<Option<Vec<f32>>>,
}

impl MockTranscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call returns this text.
    pub fn with_response(self, response: &str) -> Self {
        *self
            .fallback
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = response.to_string();
        self
    }

    /// Calls return these texts in order, then repeat the last one.
    pub fn with_responses(self, responses: Vec<String>) -> Self {
        *self
            .responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = responses.into();
        self
    }

    /// Every call fails.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = Some(message.to_string());
        self
    }

    /// Keep a copy of the last audio passed to `transcribe`.
    pub fn with_capture(mut self) -> Self {
        self.capture = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The last audio seen, when capture is enabled.
    pub fn captured_audio(&self) -> Option<Vec<f32>> {
        self.captured
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, audio: &[f32]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.capture {
            *self
                .captured
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(audio.to_vec());
        }

        if self.should_fail {
            return Err(LivecapError::Transcription {
                message: self
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "mock transcription failure".to_string()),
            });
        }

        let mut queue = self
            .responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(next) = queue.pop_front() {
            *self
                .fallback
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = next.clone();
            return Ok(next);
        }

        Ok(self
            .fallback
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn model_name(&self) -> &str {
        "mock"
    }

    fn is_ready(&self) -> bool {
        !self.should_fail
    }
}
