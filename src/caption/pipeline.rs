//! The caption pipeline worker.
//!
//! Wires an [`AudioSource`] through the frame queue into a single worker
//! thread that maintains the rolling window and, on a fixed cadence, runs
//! silence gate → engine → dedup → sink. Every error inside the loop is
//! recoverable; only `start` can fail.

use crate::audio::downmix::downmix_to_mono;
use crate::audio::frame::{FrameConsumer, frame_queue};
use crate::audio::source::AudioSource;
use crate::caption::clock::{Clock, SystemClock};
use crate::caption::dedup::Deduplicator;
use crate::caption::report::{ErrorReporter, LogReporter};
use crate::caption::silence::SilenceGate;
use crate::caption::sink::TextSink;
use crate::caption::window::RollingWindow;
use crate::config::Config;
use crate::defaults;
use crate::error::Result;
use crate::stt::transcriber::Transcriber;
use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Tuning for a caption pipeline run.
#[derive(Debug, Clone)]
pub struct CaptionPipelineConfig {
    pub sample_rate: u32,
    pub window_seconds: u32,
    /// How often the window is transcribed.
    pub interval: Duration,
    pub silence_threshold: f32,
    /// Frame queue capacity (drop-oldest beyond this).
    pub queue_capacity: usize,
    /// How long the worker blocks on the queue before re-checking the stop
    /// flag and the cadence. Bounds shutdown latency.
    pub poll_interval: Duration,
}

impl Default for CaptionPipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            window_seconds: defaults::WINDOW_SECONDS,
            interval: Duration::from_secs_f32(defaults::TRANSCRIBE_INTERVAL_SECS),
            silence_threshold: defaults::SILENCE_THRESHOLD,
            queue_capacity: defaults::FRAME_QUEUE_CAPACITY,
            poll_interval: Duration::from_millis(defaults::POLL_INTERVAL_MS),
        }
    }
}

impl CaptionPipelineConfig {
    /// Derive pipeline tuning from the user-facing config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            sample_rate: config.audio.sample_rate,
            window_seconds: config.caption.window_seconds,
            interval: Duration::from_secs_f32(config.caption.interval_secs),
            silence_threshold: config.caption.silence_threshold,
            ..Self::default()
        }
    }

    fn window_samples(&self) -> usize {
        self.sample_rate as usize * self.window_seconds as usize
    }
}

/// Builder for a caption pipeline run.
pub struct CaptionPipeline {
    config: CaptionPipelineConfig,
    clock: Arc<dyn Clock>,
    reporter: Arc<dyn ErrorReporter>,
}

impl CaptionPipeline {
    pub fn new(config: CaptionPipelineConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            reporter: Arc::new(LogReporter),
        }
    }

    /// Replace the time source (tests drive cadence with a mock clock).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the error reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Start the source and the worker thread.
    ///
    /// # Errors
    /// Fails if the source cannot start or the worker thread cannot spawn;
    /// in both cases nothing is left running.
    pub fn start(
        self,
        mut source: Box<dyn AudioSource>,
        transcriber: Arc<dyn Transcriber>,
        sink: Box<dyn TextSink>,
    ) -> Result<CaptionHandle> {
        let (producer, consumer) = frame_queue(self.config.queue_capacity);
        source.start(producer)?;

        let running = Arc::new(AtomicBool::new(true));
        let (result_tx, result_rx) = bounded(1);

        let worker_running = Arc::clone(&running);
        let config = self.config.clone();
        let clock = Arc::clone(&self.clock);
        let reporter = Arc::clone(&self.reporter);
        let poll_interval = config.poll_interval;

        let worker = std::thread::Builder::new()
            .name("caption-worker".to_string())
            .spawn(move || {
                let result = run_worker(
                    config,
                    consumer,
                    source,
                    transcriber,
                    sink,
                    clock,
                    reporter,
                    worker_running,
                );
                result_tx.send(result).ok();
            })
            .map_err(|e| {
                running.store(false, Ordering::SeqCst);
                crate::error::LivecapError::Io(e)
            })?;

        Ok(CaptionHandle {
            running,
            worker: Some(worker),
            result_rx,
            poll_interval,
        })
    }
}

/// The worker loop. Returns the sink's finish result.
#[allow(clippy::too_many_arguments)]
fn run_worker(
    config: CaptionPipelineConfig,
    consumer: FrameConsumer,
    mut source: Box<dyn AudioSource>,
    transcriber: Arc<dyn Transcriber>,
    mut sink: Box<dyn TextSink>,
    clock: Arc<dyn Clock>,
    reporter: Arc<dyn ErrorReporter>,
    running: Arc<AtomicBool>,
) -> Option<String> {
    let mut window = RollingWindow::new(config.window_samples());
    let gate = SilenceGate::new(config.silence_threshold);
    let mut dedup = Deduplicator::new();
    let finite = source.is_finite();
    let mut last_tick = clock.now();

    while running.load(Ordering::SeqCst) {
        let disconnected = match consumer.recv_timeout(config.poll_interval) {
            Ok(frame) => {
                let mono = downmix_to_mono(&frame.samples, frame.channels);
                window.append(&mono);
                false
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => true,
        };

        // Cadence is wall-clock driven, independent of frame arrival. A
        // finite source gets one last flush when its producer hangs up.
        let due = clock.now().duration_since(last_tick) >= config.interval;
        if due || (disconnected && finite) {
            last_tick = clock.now();
            tick(
                &window,
                &gate,
                transcriber.as_ref(),
                &mut dedup,
                sink.as_mut(),
                reporter.as_ref(),
            );
        }

        if disconnected {
            break;
        }
    }

    if let Err(e) = source.stop() {
        reporter.report("source", &e);
    }

    let dropped = consumer.dropped_frames();
    if dropped > 0 {
        eprintln!("livecap: {} audio frame(s) dropped under load", dropped);
    }

    sink.finish()
}

/// One cadence firing: gate → transcribe → dedup → sink.
fn tick(
    window: &RollingWindow,
    gate: &SilenceGate,
    transcriber: &dyn Transcriber,
    dedup: &mut Deduplicator,
    sink: &mut dyn TextSink,
    reporter: &dyn ErrorReporter,
) {
    if gate.is_silent(window.as_slice()) {
        return;
    }

    let snapshot = window.snapshot();
    match transcriber.transcribe(&snapshot) {
        Ok(text) => {
            if let Some(line) = dedup.process(&text)
                && let Err(e) = sink.handle(&line)
            {
                reporter.report("sink", &e);
            }
        }
        Err(e) => reporter.report("transcribe", &e),
    }
}

/// Handle to a running caption pipeline.
pub struct CaptionHandle {
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    result_rx: Receiver<Option<String>>,
    poll_interval: Duration,
}

impl CaptionHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Signal the worker to stop and wait for it to wind down.
    ///
    /// The worker observes the flag within one poll interval. Returns the
    /// sink's finish result; a worker that fails to exit within the deadline
    /// is detached rather than hung on.
    pub fn stop(mut self) -> Option<String> {
        self.running.store(false, Ordering::SeqCst);

        let result = self
            .result_rx
            .recv_timeout(self.poll_interval * 50)
            .ok()
            .flatten();

        self.join_with_deadline();
        result
    }

    /// Block until the pipeline finishes on its own (finite sources).
    pub fn wait(mut self) -> Option<String> {
        let result = self.result_rx.recv().ok().flatten();
        self.join_with_deadline();
        result
    }

    fn join_with_deadline(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        let deadline = Instant::now() + Duration::from_secs(1);
        while !worker.is_finished() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }

        if worker.is_finished() {
            if let Err(panic) = worker.join() {
                let msg = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                eprintln!("livecap: caption worker panicked: {}", msg);
            }
        } else {
            eprintln!("livecap: caption worker did not exit in time, detaching");
        }
    }
}

impl Drop for CaptionHandle {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
