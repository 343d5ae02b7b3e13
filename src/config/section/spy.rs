//! `[spy]` section: scroll-spy visibility settings.
//!
//! # Example
//!
//! ```toml
//! [spy]
//! thresholds = [0.0, 0.25, 0.5, 0.75, 1.0]
//! root_margin = 80      # px; defaults to nav.header_offset
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::platform::ObserveOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpyConfig {
    /// Ascending visibility ratios in `0.0..=1.0`.
    pub thresholds: Vec<f64>,
    /// Pixels excluded from the top of the viewport.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_margin: Option<f64>,
}

impl Default for SpyConfig {
    fn default() -> Self {
        Self {
            thresholds: ObserveOptions::default().thresholds,
            root_margin: None,
        }
    }
}

impl SpyConfig {
    /// Observer settings; the root margin falls back to the header offset.
    pub fn observe_options(&self, header_offset: u32) -> ObserveOptions {
        ObserveOptions {
            thresholds: self.thresholds.clone(),
            root_margin_top: self.root_margin.unwrap_or(f64::from(header_offset)),
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let field = || FieldPath::new("spy.thresholds");

        if self.thresholds.is_empty() {
            diag.error_with_hint(
                field(),
                "no thresholds, scroll-spy would never fire",
                "thresholds = [0.0, 0.25, 0.5, 0.75, 1.0]",
            );
            return;
        }
        if let Some(bad) = self.thresholds.iter().find(|t| !(0.0..=1.0).contains(*t)) {
            diag.error(field(), format!("threshold {bad} is outside 0.0..=1.0"));
        }
        if !self.thresholds.is_sorted_by(|a, b| a < b) {
            diag.error(field(), "thresholds must be strictly ascending");
        }
        if let Some(margin) = self.root_margin
            && margin < 0.0
        {
            diag.error(FieldPath::new("spy.root_margin"), "root margin cannot be negative");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_margin_defaults_to_header_offset() {
        let config = SpyConfig::default();
        assert_eq!(config.observe_options(80).root_margin_top, 80.0);

        let config = SpyConfig {
            root_margin: Some(0.0),
            ..SpyConfig::default()
        };
        assert_eq!(config.observe_options(80).root_margin_top, 0.0);
    }

    #[test]
    fn test_validate_default_is_clean() {
        let mut diag = ConfigDiagnostics::new();
        SpyConfig::default().validate(&mut diag);
        assert!(diag.is_empty());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn test_validate_thresholds() {
        let cases: [(&[f64], usize); 4] = [
            (&[], 1),
            (&[0.0, 1.5], 1),
            (&[0.5, 0.25], 1),
            (&[-0.1, 0.5, 0.5], 2),
        ];
        for (thresholds, errors) in cases {
            let mut diag = ConfigDiagnostics::new();
            SpyConfig {
                thresholds: thresholds.to_vec(),
                root_margin: None,
            }
            .validate(&mut diag);
            assert_eq!(diag.len(), errors, "{thresholds:?}");
        }
    }
}
