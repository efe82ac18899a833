//! Terminal rendering for captions and device listings.

use crate::audio::source::DeviceInfo;
use crate::caption::sink::TextSink;
use crate::error::Result;
use owo_colors::OwoColorize;
use std::time::Instant;

/// Clear the current terminal line (for transient status output).
pub fn clear_line() {
    print!("\r\x1b[2K");
    use std::io::Write;
    std::io::stdout().flush().ok();
}

/// Caption sink that prints each line with a dimmed elapsed-time tag.
pub struct ConsoleSink {
    start: Instant,
    lines: u64,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            lines: 0,
        }
    }

    fn timestamp(&self) -> String {
        let elapsed = self.start.elapsed().as_secs();
        format!("[{:02}:{:02}]", elapsed / 60, elapsed % 60)
    }
}

impl TextSink for ConsoleSink {
    fn handle(&mut self, text: &str) -> Result<()> {
        println!("{} {}", self.timestamp().dimmed(), text);
        self.lines += 1;
        Ok(())
    }

    fn finish(&mut self) -> Option<String> {
        if self.lines > 0 {
            Some(format!("{} caption line(s)", self.lines))
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

/// Render the `livecap devices` listing. The recommended device carries a
/// green marker; indices are the ones `--device` accepts.
pub fn render_device_list(devices: &[DeviceInfo]) {
    println!("Available audio input devices:");
    for device in devices {
        let marker = if device.recommended {
            "●".green().to_string()
        } else {
            "○".to_string()
        };
        println!(
            "  {} [{}] {} ({} ch)",
            marker, device.index, device.name, device.max_channels
        );
    }
    if let Some(best) = devices.iter().find(|d| d.recommended) {
        println!();
        println!(
            "{} {} is used when no --device is given",
            "●".green(),
            best.name
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_sink_counts_lines() {
        let mut sink = ConsoleSink::new();
        assert_eq!(sink.finish(), None);

        sink.handle("first").unwrap();
        sink.handle("second").unwrap();
        assert_eq!(sink.finish(), Some("2 caption line(s)".to_string()));
    }

    #[test]
    fn timestamp_starts_at_zero() {
        let sink = ConsoleSink::new();
        assert_eq!(sink.timestamp(), "[00:00]");
    }

    #[test]
    fn render_device_list_does_not_panic() {
        render_device_list(&[
            DeviceInfo {
                index: 0,
                name: "Monitor of Built-in Audio".to_string(),
                max_channels: 2,
                recommended: true,
            },
            DeviceInfo {
                index: 1,
                name: "Built-in Microphone".to_string(),
                max_channels: 1,
                recommended: false,
            },
        ]);
        render_device_list(&[]);
    }
}
