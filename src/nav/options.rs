//! Per-navigation settings.

use std::time::Duration;

use serde::Serialize;

/// Retry and offset settings for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavOptions {
    /// Retries after the first lookup (total lookups = `max_retries + 1`).
    pub max_retries: u32,
    /// Fixed delay between lookups.
    #[serde(serialize_with = "serialize_millis")]
    pub retry_delay: Duration,
    /// Pixels hidden under the fixed header.
    pub header_offset: u32,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            max_retries: 10,
            retry_delay: Duration::from_millis(100),
            header_offset: 80,
        }
    }
}

impl NavOptions {
    /// Options that never retry.
    pub fn immediate(header_offset: u32) -> Self {
        Self {
            max_retries: 0,
            retry_delay: Duration::ZERO,
            header_offset,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_header_offset(mut self, offset: u32) -> Self {
        self.header_offset = offset;
        self
    }

    /// Total lookup attempts (initial + retries).
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Worst-case time spent waiting between lookups.
    #[inline]
    pub fn budget(&self) -> Duration {
        self.retry_delay.saturating_mul(self.max_retries)
    }

    /// Scroll target for an element whose top edge is at `top`.
    #[inline]
    pub fn scroll_target(&self, top: f64) -> f64 {
        (top - f64::from(self.header_offset)).max(0.0)
    }
}

fn serialize_millis<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget() {
        let options = NavOptions::default()
            .with_max_retries(5)
            .with_retry_delay(Duration::from_millis(40));
        assert_eq!(options.budget(), Duration::from_millis(200));
        assert_eq!(options.attempts(), 6);
    }

    #[test]
    fn test_immediate_has_no_budget() {
        let options = NavOptions::immediate(0);
        assert_eq!(options.budget(), Duration::ZERO);
        assert_eq!(options.attempts(), 1);
    }

    #[test]
    fn test_scroll_target_offsets_header() {
        let options = NavOptions::default().with_header_offset(80);
        assert_eq!(options.scroll_target(500.0), 420.0);
        // never scrolls above the document
        assert_eq!(options.scroll_target(30.0), 0.0);
    }
}
