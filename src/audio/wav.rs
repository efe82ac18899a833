//! WAV file audio source for pipe mode.

use crate::audio::downmix::downmix_to_mono;
use crate::audio::frame::{AudioFrame, FrameProducer};
use crate::audio::source::AudioSource;
use crate::error::{LivecapError, Result};
use std::io::Read;
use std::thread::JoinHandle;

/// Finite audio source that reads WAV data.
///
/// Accepts arbitrary sample rates and channel counts: the audio is downmixed
/// to mono and resampled to the pipeline rate up front, then delivered as
/// 100 ms frames. Delivery uses the blocking queue path so no audio is lost
/// when the file outruns the transcriber.
pub struct WavFrameSource {
    samples: Vec<f32>,
    chunk_size: usize,
    feeder: Option<JoinHandle<()>>,
}

impl WavFrameSource {
    /// Create from any reader (for testing/flexibility).
    pub fn from_reader(reader: Box<dyn Read + Send>, target_rate: u32) -> Result<Self> {
        let mut wav_reader =
            hound::WavReader::new(reader).map_err(|e| LivecapError::AudioCapture {
                message: format!("Failed to parse WAV file: {}", e),
            })?;

        let spec = wav_reader.spec();
        let source_rate = spec.sample_rate;
        let source_channels = spec.channels;

        let raw_samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => wav_reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
                .collect::<std::result::Result<Vec<_>, _>>(),
            hound::SampleFormat::Float => wav_reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>(),
        }
        .map_err(|e| LivecapError::AudioCapture {
            message: format!("Failed to read WAV samples: {}", e),
        })?;

        let mono = downmix_to_mono(&raw_samples, source_channels);

        let samples = if source_rate != target_rate {
            resample(&mono, source_rate, target_rate)
        } else {
            mono
        };

        Ok(Self {
            samples,
            // 100ms frames at the target rate
            chunk_size: (target_rate / 10).max(1) as usize,
            feeder: None,
        })
    }

    /// Create from stdin.
    pub fn from_stdin(target_rate: u32) -> Result<Self> {
        use std::io::Cursor;

        // Read all data from stdin into memory first (StdinLock is not Send)
        let mut buffer = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .map_err(|e| LivecapError::AudioCapture {
                message: format!("Failed to read from stdin: {}", e),
            })?;

        Self::from_reader(Box::new(Cursor::new(buffer)), target_rate)
    }

    /// Total mono samples after conversion.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl AudioSource for WavFrameSource {
    fn start(&mut self, producer: FrameProducer) -> Result<()> {
        let samples = std::mem::take(&mut self.samples);
        let chunk_size = self.chunk_size;

        // The feeder drops the producer at end of input, which disconnects
        // the queue and tells the pipeline to flush and exit.
        self.feeder = Some(std::thread::spawn(move || {
            for chunk in samples.chunks(chunk_size) {
                producer.send(AudioFrame::mono(chunk.to_vec()));
            }
        }));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(feeder) = self.feeder.take() {
            feeder.join().ok();
        }
        Ok(())
    }

    fn is_finite(&self) -> bool {
        true
    }
}

/// Simple linear interpolation resampling.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[samples.len() - 1]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as f32
            }
        })
        .collect()
}
