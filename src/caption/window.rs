//! Fixed-length rolling audio window.

/// A rolling window over the most recent mono samples.
///
/// The window always holds exactly `capacity` samples: it starts zero-filled
/// and every append shifts older audio out the front. This gives the engine a
/// constant-length input regardless of how capture frames are sized.
pub struct RollingWindow {
    samples: Vec<f32>,
}

impl RollingWindow {
    /// Create a zero-filled window holding `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![0.0; capacity.max(1)],
        }
    }

    /// Window length in samples. Equal to [`RollingWindow::len`] at all times.
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Append new samples, discarding the oldest.
    ///
    /// If `incoming` is at least a whole window, the window becomes its last
    /// `capacity` samples. Otherwise existing samples shift toward the front
    /// and the new ones fill the tail.
    pub fn append(&mut self, incoming: &[f32]) {
        let capacity = self.samples.len();
        let k = incoming.len();

        if k >= capacity {
            self.samples.copy_from_slice(&incoming[k - capacity..]);
        } else if k > 0 {
            self.samples.copy_within(k.., 0);
            self.samples[capacity - k..].copy_from_slice(incoming);
        }
    }

    /// Ordered copy of the window, oldest sample first.
    pub fn snapshot(&self) -> Vec<f32> {
        self.samples.clone()
    }

    /// Borrow the window contents, oldest sample first.
    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zero_filled_at_capacity() {
        let window = RollingWindow::new(8);
        assert_eq!(window.len(), 8);
        assert_eq!(window.capacity(), 8);
        assert_eq!(window.snapshot(), vec![0.0; 8]);
    }

    #[test]
    fn len_equals_capacity_after_every_append() {
        let mut window = RollingWindow::new(4);
        for chunk in [vec![1.0], vec![2.0, 3.0], vec![4.0; 9], vec![]] {
            window.append(&chunk);
            assert_eq!(window.len(), window.capacity());
        }
    }

    #[test]
    fn small_append_shifts_left() {
        let mut window = RollingWindow::new(4);
        window.append(&[1.0, 2.0, 3.0, 4.0]);
        window.append(&[5.0, 6.0]);
        assert_eq!(window.snapshot(), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn exact_capacity_append_replaces_contents() {
        let mut window = RollingWindow::new(3);
        window.append(&[1.0, 2.0, 3.0]);
        assert_eq!(window.snapshot(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn oversized_append_keeps_last_capacity_samples() {
        let mut window = RollingWindow::new(3);
        window.append(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(window.snapshot(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn empty_append_is_a_noop() {
        let mut window = RollingWindow::new(3);
        window.append(&[1.0, 2.0, 3.0]);
        window.append(&[]);
        assert_eq!(window.snapshot(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn partial_append_keeps_leading_zeros() {
        let mut window = RollingWindow::new(4);
        window.append(&[9.0]);
        assert_eq!(window.snapshot(), vec![0.0, 0.0, 0.0, 9.0]);
    }

    #[test]
    fn snapshot_matches_tail_of_all_appended_samples() {
        // Mixed-size appends; the window must always equal the last
        // `capacity` samples of everything appended (zeros included).
        let capacity = 10;
        let mut window = RollingWindow::new(capacity);
        let mut history: Vec<f32> = vec![0.0; capacity];

        let chunks: Vec<Vec<f32>> = vec![
            (0..3).map(|i| i as f32).collect(),
            (3..10).map(|i| i as f32).collect(),
            (10..35).map(|i| i as f32).collect(),
            vec![],
            (35..39).map(|i| i as f32).collect(),
        ];

        for chunk in chunks {
            history.extend_from_slice(&chunk);
            window.append(&chunk);
            let expected = &history[history.len() - capacity..];
            assert_eq!(window.snapshot(), expected.to_vec());
        }
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut window = RollingWindow::new(2);
        window.append(&[1.0, 2.0]);
        let snapshot = window.snapshot();
        window.append(&[3.0]);
        assert_eq!(snapshot, vec![1.0, 2.0]);
        assert_eq!(window.snapshot(), vec![2.0, 3.0]);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut window = RollingWindow::new(0);
        assert_eq!(window.capacity(), 1);
        window.append(&[5.0]);
        assert_eq!(window.snapshot(), vec![5.0]);
    }
}
