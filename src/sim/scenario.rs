//! Scenario files: page layouts plus a script of user actions.
//!
//! ```toml
//! viewport = 800
//! header = 80            # optional, defaults to nav.header_offset
//!
//! [[pages]]
//! path = "/leistungen"
//! mount_delay = 250      # ms between page switch and content mount
//! sections = [{ id = "messebau", height = 600 }, { id = "logistik", height = 900 }]
//!
//! [[steps]]
//! action = "load"
//! fragment = "#/leistungen#messebau"
//!
//! [[steps]]
//! action = "navigate"
//! page = "/aktuelles"
//! section = "news"
//!
//! [[steps]]
//! action = "scroll"
//! y = 1200
//!
//! [[steps]]
//! action = "wait"
//! ms = 300
//!
//! [[steps]]
//! action = "back"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::address::Address;
use crate::platform::memory::PageLayout;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("cannot read scenario `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("scenario parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("scenario has no steps")]
    NoSteps,

    #[error("viewport height must be positive, got {0}")]
    Viewport(f64),

    #[error("section `{section}` on {page} has negative height")]
    Height { page: String, section: String },
}

fn default_viewport() -> f64 {
    800.0
}

/// A replayable navigation scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Viewport height in px.
    #[serde(default = "default_viewport")]
    pub viewport: f64,
    /// Fixed header height in px.
    #[serde(default)]
    pub header: Option<f64>,
    #[serde(default)]
    pub pages: Vec<PageLayout>,
    pub steps: Vec<Step>,
}

/// One user action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    /// Open the site at a fragment (initial load).
    Load {
        #[serde(default)]
        fragment: String,
    },
    /// Click a link.
    Navigate {
        page: String,
        #[serde(default)]
        section: Option<String>,
    },
    /// User scroll to an absolute offset.
    Scroll { y: f64 },
    /// Let time pass.
    Wait { ms: u64 },
    /// Browser back button.
    Back,
    /// Browser forward button.
    Forward,
}

impl Step {
    /// Link target of a `navigate` step.
    pub fn target(&self) -> Option<Address> {
        match self {
            Self::Navigate { page, section } => Some(Address::new(page, section.as_deref())),
            _ => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { fragment } => write!(f, "load {fragment}"),
            Self::Navigate { .. } => match self.target() {
                Some(target) => write!(f, "navigate {}", target.href()),
                None => Ok(()),
            },
            Self::Scroll { y } => write!(f, "scroll {y}"),
            Self::Wait { ms } => write!(f, "wait {ms}ms"),
            Self::Back => f.write_str("back"),
            Self::Forward => f.write_str("forward"),
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content =
            fs::read_to_string(path).map_err(|err| ScenarioError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.steps.is_empty() {
            return Err(ScenarioError::NoSteps);
        }
        if self.viewport <= 0.0 {
            return Err(ScenarioError::Viewport(self.viewport));
        }
        for page in &self.pages {
            if let Some(section) = page.sections.iter().find(|s| s.height < 0.0) {
                return Err(ScenarioError::Height {
                    page: page.path.clone(),
                    section: section.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Longest mount delay of any page, in ms.
    pub fn max_mount_delay(&self) -> u64 {
        self.pages.iter().map(|p| p.mount_delay).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r##"
viewport = 600

[[pages]]
path = "/leistungen"
mount_delay = 250
sections = [{ id = "messebau", height = 600 }, { id = "logistik", height = 900 }]

[[steps]]
action = "load"
fragment = "#/leistungen#messebau"

[[steps]]
action = "navigate"
page = "/aktuelles"
section = "news"

[[steps]]
action = "scroll"
y = 1200

[[steps]]
action = "wait"
ms = 300

[[steps]]
action = "back"
"##;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_str(SCENARIO).unwrap();
        assert_eq!(scenario.viewport, 600.0);
        assert_eq!(scenario.header, None);
        assert_eq!(scenario.pages[0].sections.len(), 2);
        assert_eq!(scenario.max_mount_delay(), 250);
        assert_eq!(
            scenario.steps,
            vec![
                Step::Load {
                    fragment: "#/leistungen#messebau".into()
                },
                Step::Navigate {
                    page: "/aktuelles".into(),
                    section: Some("news".into())
                },
                Step::Scroll { y: 1200.0 },
                Step::Wait { ms: 300 },
                Step::Back,
            ]
        );
    }

    #[test]
    fn test_step_display() {
        let step = Step::Navigate {
            page: "aktuelles".into(),
            section: Some("news".into()),
        };
        assert_eq!(step.to_string(), "navigate #/aktuelles#news");
        assert_eq!(Step::Wait { ms: 5 }.to_string(), "wait 5ms");
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        assert!(matches!(
            Scenario::from_str("steps = []"),
            Err(ScenarioError::NoSteps)
        ));
        assert!(matches!(
            Scenario::from_str("[[steps]]\naction = \"jump\""),
            Err(ScenarioError::Toml(_))
        ));
        assert!(matches!(
            Scenario::from_str("viewport = 0\n[[steps]]\naction = \"back\""),
            Err(ScenarioError::Viewport(_))
        ));
    }
}
