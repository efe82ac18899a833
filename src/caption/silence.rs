//! Peak-amplitude silence gate.
//!
//! A window whose loudest sample stays below the threshold is skipped without
//! invoking the engine. This is a gate, not a VAD: no state, no hangover.

/// Largest absolute sample value in the slice. NaN samples are ignored.
pub fn peak_amplitude(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |peak, &s| peak.max(s.abs()))
}

/// Decides whether a window is silent.
#[derive(Debug, Clone, Copy)]
pub struct SilenceGate {
    threshold: f32,
}

impl SilenceGate {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// True when the peak amplitude is strictly below the threshold.
    pub fn is_silent(&self, samples: &[f32]) -> bool {
        peak_amplitude(samples) < self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    fn gate() -> SilenceGate {
        SilenceGate::new(defaults::SILENCE_THRESHOLD)
    }

    #[test]
    fn all_zeros_is_silent() {
        assert!(gate().is_silent(&vec![0.0; 16000]));
    }

    #[test]
    fn single_full_scale_sample_is_not_silent() {
        let mut samples = vec![0.0; 16000];
        samples[7000] = 1.0;
        assert!(!gate().is_silent(&samples));
    }

    #[test]
    fn negative_peaks_count() {
        let samples = vec![0.0, -0.5, 0.0];
        assert!(!gate().is_silent(&samples));
    }

    #[test]
    fn just_below_threshold_is_silent() {
        let samples = vec![0.009_f32; 100];
        assert!(gate().is_silent(&samples));
    }

    #[test]
    fn exactly_at_threshold_is_not_silent() {
        let samples = vec![defaults::SILENCE_THRESHOLD; 100];
        assert!(!gate().is_silent(&samples));
    }

    #[test]
    fn empty_slice_is_silent() {
        assert!(gate().is_silent(&[]));
    }

    #[test]
    fn zero_threshold_never_silent_with_signal() {
        let gate = SilenceGate::new(0.0);
        assert!(!gate.is_silent(&[0.0001]));
        // Peak 0.0 is not strictly below 0.0 either.
        assert!(!gate.is_silent(&[0.0]));
    }

    #[test]
    fn peak_amplitude_finds_largest_magnitude() {
        assert_eq!(peak_amplitude(&[0.1, -0.7, 0.3]), 0.7);
        assert_eq!(peak_amplitude(&[]), 0.0);
    }

    #[test]
    fn peak_amplitude_ignores_nan() {
        assert_eq!(peak_amplitude(&[0.2, f32::NAN, 0.1]), 0.2);
    }
}
