//! Suppresses repeated caption lines.
//!
//! With a rolling window the engine sees mostly the same audio on consecutive
//! ticks, so identical transcripts are the common case, not the exception.

/// Tracks the last emitted line and filters repeats and blanks.
#[derive(Debug, Default)]
pub struct Deduplicator {
    last: Option<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the trimmed line to emit, or None for blanks and repeats.
    ///
    /// State only changes when a line is emitted, so a blank between two
    /// identical transcripts does not let the repeat through.
    pub fn process(&mut self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        if self.last.as_deref() == Some(trimmed) {
            return None;
        }
        self.last = Some(trimmed.to_string());
        Some(trimmed.to_string())
    }

    pub fn last_emitted(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_never_emits() {
        let mut dedup = Deduplicator::new();
        assert_eq!(dedup.process(""), None);
        assert_eq!(dedup.process("   "), None);
        assert_eq!(dedup.last_emitted(), None);
    }

    #[test]
    fn first_text_emits() {
        let mut dedup = Deduplicator::new();
        assert_eq!(dedup.process("hello"), Some("hello".to_string()));
        assert_eq!(dedup.last_emitted(), Some("hello"));
    }

    #[test]
    fn identical_repeat_is_suppressed() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.process("hello").is_some());
        assert_eq!(dedup.process("hello"), None);
    }

    #[test]
    fn changed_text_emits() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.process("hello").is_some());
        assert_eq!(dedup.process("world"), Some("world".to_string()));
        assert_eq!(dedup.last_emitted(), Some("world"));
    }

    #[test]
    fn alternating_text_emits_each_change() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.process("a").is_some());
        assert!(dedup.process("b").is_some());
        assert!(dedup.process("a").is_some());
    }

    #[test]
    fn trims_before_comparing() {
        let mut dedup = Deduplicator::new();
        assert_eq!(dedup.process("  hello \n"), Some("hello".to_string()));
        assert_eq!(dedup.process("hello"), None);
    }

    #[test]
    fn blank_between_repeats_does_not_reset() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.process("hello").is_some());
        assert_eq!(dedup.process(""), None);
        assert_eq!(dedup.process("hello"), None);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.process("Hello").is_some());
        assert!(dedup.process("hello").is_some());
    }

    #[test]
    fn reset_allows_repeat() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.process("hello").is_some());
        dedup.reset();
        assert!(dedup.process("hello").is_some());
    }
}
