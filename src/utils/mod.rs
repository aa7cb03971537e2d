//! Common utilities and helpers

use std::time::Duration;

pub mod logging;
pub mod path;

/// Formatting helpers for console output
pub struct Utils;

impl Utils {
    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        let milliseconds = duration.subsec_millis();

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }

    /// `part` as a percentage of `whole`, one decimal; "n/a" when `whole` is 0
    pub fn format_ratio(part: usize, whole: usize) -> String {
        if whole == 0 {
            "n/a".to_string()
        } else {
            format!("{:.1}%", part as f64 / whole as f64 * 100.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(Utils::format_duration(Duration::from_millis(65_250)), "01:05.250");
        assert_eq!(Utils::format_duration(Duration::from_secs(3_725)), "01:02:05.000");
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(Utils::format_ratio(1, 4), "25.0%");
        assert_eq!(Utils::format_ratio(2, 3), "66.7%");
        assert_eq!(Utils::format_ratio(0, 0), "n/a");
    }
}
