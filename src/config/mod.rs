//! Site configuration management for `fragnav.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── nav        # [nav]
//! │   ├── spy        # [spy]
//! │   └── pages      # [[pages]]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```

pub mod section;
pub mod types;
mod util;

pub use section::{NavConfig, PageConfig, SpyConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::find_config_file;

use crate::address::{SectionRegistry, normalize_page};
use crate::log;
use crate::nav::NavOptions;
use crate::platform::ObserveOptions;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Default config filename
pub const CONFIG_FILE: &str = "fragnav.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing fragnav.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Path the config was loaded from (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub nav: NavConfig,

    #[serde(default)]
    pub spy: SpyConfig,

    #[serde(default)]
    pub pages: Vec<PageConfig>,
}

impl SiteConfig {
    /// Load, validate and normalize a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::from_path(path)?;
        config.config_path = path.to_path_buf();
        config.validate()?;
        config.normalize();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Canonicalize page paths (leading `/`, no trailing `/`).
    fn normalize(&mut self) {
        for page in &mut self.pages {
            page.path = normalize_page(&page.path);
        }
    }

    // ========================================================================
    // derived values
    // ========================================================================

    /// Section registry for the configured pages.
    pub fn registry(&self) -> SectionRegistry {
        SectionRegistry::from_config(&self.pages)
    }

    /// Default options for every navigation.
    pub fn nav_options(&self) -> NavOptions {
        self.nav.options()
    }

    pub fn observe_options(&self) -> ObserveOptions {
        self.spy.observe_options(self.nav.header_offset)
    }

    pub fn grace(&self) -> Duration {
        self.nav.grace()
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the whole configuration.
    ///
    /// Collects all validation errors and returns them at once; warnings are
    /// printed but do not fail.
    pub fn validate(&self) -> Result<()> {
        let diag = self.diagnostics();
        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Run every section validator without printing.
    pub fn diagnostics(&self) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        self.nav.validate(&mut diag);
        self.spy.validate(&mut diag);
        section::validate_pages(&self.pages, &mut diag);
        diag
    }

    // ========================================================================
    // template
    // ========================================================================

    /// Write a commented starter config. Refuses to overwrite unless `force`.
    pub fn write_template(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!(
                "'{}' already exists (use --force to overwrite)",
                path.display()
            );
        }
        fs::write(path, Self::template())
            .map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Ok(())
    }

    /// Starter `fragnav.toml`.
    pub fn template() -> String {
        let nav = NavConfig::default();
        let spy = SpyConfig::default();
        let thresholds = spy
            .thresholds
            .iter()
            .map(|t| format!("{t:?}"))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"# fragnav configuration file (v{version})

[nav]
max_retries = {max_retries}      # retries after the first lookup
retry_delay = {retry_delay}     # ms between lookups
header_offset = {header_offset}    # px hidden under the fixed header
grace = {grace}           # ms the suppression window outlives the retry budget

[spy]
thresholds = [{thresholds}]
# root_margin = {header_offset}   # px; defaults to nav.header_offset

[[pages]]
path = "/"
sections = []

[[pages]]
path = "/leistungen"
sections = ["messebau", "logistik"]
"#,
            version = env!("CARGO_PKG_VERSION"),
            max_retries = nav.max_retries,
            retry_delay = nav.retry_delay,
            header_offset = nav.header_offset,
            grace = nav.grace,
        )
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
