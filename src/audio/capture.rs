//! Live audio capture using CPAL (Cross-Platform Audio Library).

use crate::audio::frame::{AudioFrame, FrameProducer};
use crate::audio::source::{AudioSource, DeviceInfo};
use crate::error::{LivecapError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};

/// Run a closure with stderr temporarily redirected to /dev/null.
///
/// This suppresses noisy ALSA/JACK/PipeWire messages that CPAL triggers
/// when probing audio backends. The messages are harmless but confusing to users.
///
/// # Safety
/// Uses `libc::dup`/`libc::dup2` to save and restore file descriptor 2 (stderr).
/// Safe as long as no other thread is concurrently manipulating fd 2.
fn with_suppressed_stderr<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    unsafe {
        let saved_fd = libc::dup(2);
        let devnull = libc::open(c"/dev/null".as_ptr(), libc::O_WRONLY);
        if saved_fd >= 0 && devnull >= 0 {
            libc::dup2(devnull, 2);
            libc::close(devnull);
        }

        let result = f();

        if saved_fd >= 0 {
            libc::dup2(saved_fd, 2);
            libc::close(saved_fd);
        }

        result
    }
}

/// Suppress noisy JACK/ALSA error messages that occur during audio backend probing.
///
/// # Safety
/// This modifies environment variables which is safe when called before spawning threads.
pub fn suppress_audio_warnings() {
    // SAFETY: Called at startup before any threads are spawned
    unsafe {
        std::env::set_var("JACK_NO_START_SERVER", "1");
        std::env::set_var("JACK_NO_AUDIO_RESERVATION", "1");
        std::env::set_var("PIPEWIRE_DEBUG", "0");
        std::env::set_var("ALSA_DEBUG", "0");
        std::env::set_var("PW_LOG", "0");
    }
}

/// Preferred device names. Monitor sources carry system audio, which is the
/// primary captioning input; pipewire/pulse virtual devices follow the
/// desktop's device selection.
const PREFERRED_DEVICES: &[&str] = &["monitor", "pipewire", "pulse", "PulseAudio"];

/// Device name patterns to filter out (not useful as capture inputs).
const FILTERED_PATTERNS: &[&str] = &[
    "surround",
    "front:",
    "rear:",
    "center:",
    "side:",
    "Digital Output",
    "S/PDIF",
];

/// Check if a device name should be filtered out.
fn should_filter_device(name: &str) -> bool {
    let lower = name.to_lowercase();
    FILTERED_PATTERNS
        .iter()
        .any(|pattern| lower.contains(&pattern.to_lowercase()))
}

/// Check if a device is a preferred capture source.
fn is_preferred_device(name: &str) -> bool {
    let lower = name.to_lowercase();
    PREFERRED_DEVICES
        .iter()
        .any(|pref| lower.contains(&pref.to_lowercase()))
}

/// How the user addressed a device on the CLI or in config.
#[derive(Debug, Clone, PartialEq)]
enum DeviceSelector {
    /// Position in the `livecap devices` listing.
    Index(usize),
    /// Case-insensitive name substring.
    Name(String),
}

fn parse_selector(selection: &str) -> DeviceSelector {
    match selection.trim().parse::<usize>() {
        Ok(index) => DeviceSelector::Index(index),
        Err(_) => DeviceSelector::Name(selection.to_string()),
    }
}

fn max_input_channels(device: &cpal::Device) -> u16 {
    let from_ranges = device
        .supported_input_configs()
        .ok()
        .and_then(|configs| configs.map(|c| c.channels()).max());
    from_ranges
        .or_else(|| device.default_input_config().ok().map(|c| c.channels()))
        .unwrap_or(0)
}

/// Enumerate capture devices in a stable order.
///
/// The returned indices are what `--device <index>` selects, so this must be
/// the single source of enumeration order.
///
/// # Errors
/// Returns `LivecapError::AudioCapture` if device enumeration fails.
pub fn list_input_devices() -> Result<Vec<DeviceInfo>> {
    let devices = enumerate_devices()?;
    let recommended_index = devices
        .iter()
        .position(|(name, _)| is_preferred_device(name));

    Ok(devices
        .into_iter()
        .enumerate()
        .map(|(index, (name, device))| DeviceInfo {
            index,
            max_channels: max_input_channels(&device),
            recommended: Some(index) == recommended_index,
            name,
        })
        .collect())
}

/// Named input devices after filtering, in enumeration order.
fn enumerate_devices() -> Result<Vec<(String, cpal::Device)>> {
    let devices = with_suppressed_stderr(|| {
        let host = cpal::default_host();
        host.input_devices()
    })
    .map_err(|e| LivecapError::AudioCapture {
        message: format!("Failed to enumerate input devices: {}", e),
    })?;

    let mut named = Vec::new();
    for device in devices {
        if let Ok(name) = device.name() {
            if should_filter_device(&name) {
                continue;
            }
            named.push((name, device));
        }
    }
    Ok(named)
}

/// Resolve a device selection (index, name substring, or None for the best
/// default) to a concrete device.
fn resolve_device(selection: Option<&str>) -> Result<cpal::Device> {
    match selection {
        Some(sel) => {
            let devices = enumerate_devices()?;
            match parse_selector(sel) {
                DeviceSelector::Index(index) => devices
                    .into_iter()
                    .nth(index)
                    .map(|(_, device)| device)
                    .ok_or_else(|| LivecapError::AudioDeviceNotFound {
                        device: sel.to_string(),
                    }),
                DeviceSelector::Name(name) => {
                    let lower = name.to_lowercase();
                    devices
                        .into_iter()
                        .find(|(dev_name, _)| dev_name.to_lowercase().contains(&lower))
                        .map(|(_, device)| device)
                        .ok_or_else(|| LivecapError::AudioDeviceNotFound { device: name })
                }
            }
        }
        None => get_best_default_device(),
    }
}

/// Get the best default capture device: first preferred match, then the
/// system default.
///
/// # Errors
/// Returns `LivecapError::AudioDeviceNotFound` if no input device is available.
fn get_best_default_device() -> Result<cpal::Device> {
    with_suppressed_stderr(|| {
        let host = cpal::default_host();

        if let Ok(devices) = host.input_devices() {
            for device in devices {
                if let Ok(name) = device.name()
                    && is_preferred_device(&name)
                {
                    return Ok(device);
                }
            }
        }

        host.default_input_device()
            .ok_or_else(|| LivecapError::AudioDeviceNotFound {
                device: "default".to_string(),
            })
    })
}

/// Wrapper for cpal::Stream to make it Send.
///
/// SAFETY: The stream is only accessed through the Mutex in CpalAudioSource,
/// one thread at a time.
struct SendableStream(cpal::Stream);

unsafe impl Send for SendableStream {}

/// Live capture source backed by CPAL.
///
/// Opens the device at the exact configured rate and channel count; if the
/// device rejects that format, `start` fails with a typed error instead of
/// renegotiating behind the user's back. The data callback copies the sample
/// slice into an [`AudioFrame`] and enqueues it — nothing else runs on the
/// audio thread.
pub struct CpalAudioSource {
    device: cpal::Device,
    stream: Arc<Mutex<Option<SendableStream>>>,
    sample_rate: u32,
    channels: u16,
}

impl CpalAudioSource {
    /// Create a capture source for the selected device.
    ///
    /// # Arguments
    /// * `selection` - Device index or name substring; None picks the best
    ///   default (monitor/pipewire/pulse preferred).
    /// * `sample_rate` - Capture rate in Hz.
    /// * `channels` - Interleaved channel count to request.
    ///
    /// # Errors
    /// Returns `AudioDeviceNotFound` when the selection matches nothing.
    pub fn new(selection: Option<&str>, sample_rate: u32, channels: u16) -> Result<Self> {
        let device = resolve_device(selection)?;
        Ok(Self {
            device,
            stream: Arc::new(Mutex::new(None)),
            sample_rate,
            channels,
        })
    }

    /// The resolved device name, for status output.
    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "<unknown>".to_string())
    }

    /// Build the input stream at the configured format.
    ///
    /// Tries f32 first (the pipeline's native sample type), then i16 with
    /// conversion in the callback. Anything else is a format error.
    fn build_stream(&self, producer: FrameProducer) -> Result<cpal::Stream> {
        let config = cpal::StreamConfig {
            channels: self.channels,
            sample_rate: cpal::SampleRate(self.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_callback = |err| {
            eprintln!("livecap: audio stream error: {}", err);
        };

        let channels = self.channels;
        let f32_producer = producer.clone();
        if let Ok(stream) = self.device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                f32_producer.push(AudioFrame::new(data.to_vec(), channels));
            },
            err_callback,
            None,
        ) {
            return Ok(stream);
        }

        self.device
            .build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let samples: Vec<f32> =
                        data.iter().map(|&s| s as f32 / i16::MAX as f32).collect();
                    producer.push(AudioFrame::new(samples, channels));
                },
                err_callback,
                None,
            )
            .map_err(|e| LivecapError::AudioFormat {
                message: format!(
                    "device does not support {} Hz / {} channel(s): {}",
                    self.sample_rate, self.channels, e
                ),
            })
    }
}

impl AudioSource for CpalAudioSource {
    fn start(&mut self, producer: FrameProducer) -> Result<()> {
        {
            let stream_guard = self.stream.lock().map_err(|e| LivecapError::AudioCapture {
                message: format!("Failed to lock stream: {}", e),
            })?;
            if stream_guard.is_some() {
                return Ok(()); // Already started
            }
        }

        let stream = self.build_stream(producer)?;
        stream.play().map_err(|e| LivecapError::AudioCapture {
            message: format!("Failed to start audio stream: {}", e),
        })?;

        let mut stream_guard = self.stream.lock().map_err(|e| LivecapError::AudioCapture {
            message: format!("Failed to lock stream: {}", e),
        })?;
        *stream_guard = Some(SendableStream(stream));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let mut stream_guard = self.stream.lock().map_err(|e| LivecapError::AudioCapture {
            message: format!("Failed to lock stream: {}", e),
        })?;

        if let Some(sendable_stream) = stream_guard.take() {
            sendable_stream
                .0
                .pause()
                .map_err(|e| LivecapError::AudioCapture {
                    message: format!("Failed to stop audio stream: {}", e),
                })?;
        }
        Ok(())
    }
}
