//! `fragnav simulate`: replay a scenario file.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::SiteConfig;
use crate::log;
use crate::sim::{self, Report, Scenario};

pub fn run_simulate(path: &Path, json: bool, config: &SiteConfig) -> Result<()> {
    let scenario = Scenario::load(path)
        .with_context(|| format!("Failed to load scenario '{}'", path.display()))?;
    log!("sim"; "replaying {} steps from {}", scenario.steps.len(), path.display());

    let report = sim::replay(config, &scenario)?;
    print!("{}", format_report(&report, json)?);
    Ok(())
}

/// Everything `simulate` writes to stdout.
fn format_report(report: &Report, json: bool) -> Result<String> {
    if json {
        Ok(format!("{}\n", report.to_json()?))
    } else {
        Ok(report.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r##"
viewport = 800.0
header = 120.0

[[pages]]
path = "/leistungen"
sections = [{ id = "messebau", height = 600.0 }]

[[steps]]
action = "load"
fragment = "#/leistungen#ghost"
"##;

    #[test]
    fn test_json_output_is_a_single_document() {
        let scenario = Scenario::from_str(SCENARIO).unwrap();
        // the unknown section logs a warning during replay
        let report = sim::replay(&SiteConfig::default(), &scenario).unwrap();

        let out = format_report(&report, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["scroll_y"], 0.0);
        assert_eq!(value["navigations"].as_array().map(Vec::len), Some(1));
    }
}
