//! `[nav]` section: retry and suppression timing.
//!
//! # Example
//!
//! ```toml
//! [nav]
//! max_retries = 10      # retries after the first lookup
//! retry_delay = 100     # ms between lookups
//! header_offset = 80    # px hidden under the fixed header
//! grace = 150           # ms the suppression window outlives the retry budget
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::nav::{DEFAULT_GRACE, NavOptions};

/// Retries past this are almost certainly a typo.
const MAX_SANE_RETRIES: u32 = 1_000;

/// One minute between lookups; beyond that the page is not coming.
const MAX_RETRY_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub max_retries: u32,
    /// Milliseconds.
    pub retry_delay: u64,
    pub header_offset: u32,
    /// Milliseconds.
    pub grace: u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        let options = NavOptions::default();
        Self {
            max_retries: options.max_retries,
            retry_delay: 100,
            header_offset: options.header_offset,
            grace: 150,
        }
    }
}

impl NavConfig {
    /// Default options for every navigation.
    pub fn options(&self) -> NavOptions {
        NavOptions::default()
            .with_max_retries(self.max_retries)
            .with_retry_delay(Duration::from_millis(self.retry_delay))
            .with_header_offset(self.header_offset)
    }

    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.max_retries > MAX_SANE_RETRIES {
            diag.error_with_hint(
                FieldPath::new("nav.max_retries"),
                format!("{} retries is more than {}", self.max_retries, MAX_SANE_RETRIES),
                "a handful of retries at 100ms covers most page renders",
            );
        }
        if self.retry_delay > MAX_RETRY_DELAY_MS {
            diag.error_with_hint(
                FieldPath::new("nav.retry_delay"),
                format!("{}ms between lookups is more than {}ms", self.retry_delay, MAX_RETRY_DELAY_MS),
                "lookups are cheap, keep the delay short and raise max_retries instead",
            );
        }
        if self.max_retries > 0 && self.retry_delay == 0 {
            diag.warn(
                FieldPath::new("nav.retry_delay"),
                "0ms between lookups, retries give late content no time to mount",
            );
        }
        if self.grace() < DEFAULT_GRACE / 3 {
            diag.warn(
                FieldPath::new("nav.grace"),
                format!("{}ms grace may let scroll-spy rewrite the fragment mid-scroll", self.grace),
            );
        }
    }
}
