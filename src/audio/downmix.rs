//! Channel downmixing.

/// Mix interleaved multi-channel samples to mono by arithmetic mean.
///
/// Mono input is a straight copy. A trailing partial sample group (fewer
/// samples than channels) is discarded.
pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|group| group.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}
