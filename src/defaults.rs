//! Central tuning constants.
//!
//! Every knob that affects capture, windowing, or cadence lives here so the
//! config layer and the CLI agree on a single set of defaults.

/// Sample rate the pipeline and the whisper models operate at.
pub const SAMPLE_RATE: u32 = 16000;

/// Channels requested from the capture device. Loopback/monitor devices are
/// stereo; the pipeline downmixes to mono before windowing.
pub const CHANNEL_COUNT: u16 = 2;

/// Length of the rolling audio window handed to the engine, in seconds.
pub const WINDOW_SECONDS: u32 = 5;
pub const MIN_WINDOW_SECONDS: u32 = 5;
pub const MAX_WINDOW_SECONDS: u32 = 30;

/// How often the window is transcribed, in seconds.
pub const TRANSCRIBE_INTERVAL_SECS: f32 = 3.0;
pub const MIN_TRANSCRIBE_INTERVAL_SECS: f32 = 1.0;
pub const MAX_TRANSCRIBE_INTERVAL_SECS: f32 = 10.0;

/// Peak-amplitude threshold below which a window is considered silent and
/// skipped entirely (normalized f32 samples, so 0.01 is -40 dBFS).
pub const SILENCE_THRESHOLD: f32 = 0.01;

/// How long the pipeline worker blocks on the frame queue before re-checking
/// the stop flag and the transcription cadence.
pub const POLL_INTERVAL_MS: u64 = 100;

/// Capacity of the capture-to-pipeline frame queue. Overflow drops the oldest
/// frame, so this bounds both memory and how stale a backlog can get.
pub const FRAME_QUEUE_CAPACITY: usize = 64;

pub const DEFAULT_MODEL: &str = "base";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Language value that asks the engine to auto-detect.
pub const AUTO_LANGUAGE: &str = "auto";

/// Which GPU backend was compiled in, for diagnostics output.
pub fn gpu_backend() -> &'static str {
    if cfg!(feature = "cuda") {
        "cuda"
    } else if cfg!(feature = "vulkan") {
        "vulkan"
    } else if cfg!(feature = "hipblas") {
        "hipblas"
    } else if cfg!(feature = "openblas") {
        "openblas"
    } else {
        "cpu"
    }
}
