//! Scenario replay results.

use owo_colors::OwoColorize;
use serde::Serialize;

use crate::address::Address;
use crate::nav::Outcome;

/// One navigation started during replay.
#[derive(Debug, Clone, Serialize)]
pub struct NavRecord {
    /// Step that triggered it (`navigate #/a#b`, `back`, ...).
    pub trigger: String,
    pub target: Address,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Final browser state after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub fragment: String,
    pub page: Option<String>,
    pub scroll_y: f64,
    pub dominant: Option<String>,
    pub history: Vec<String>,
    pub navigations: Vec<NavRecord>,
    /// Element lookups made by the executor.
    pub lookups: usize,
    /// Fragment rewrites made by scroll-spy.
    pub replaces: usize,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable summary.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let none = || "-".to_string();

        out.push_str(&format!("{:<10} {}\n", "fragment".bold(), self.fragment));
        out.push_str(&format!(
            "{:<10} {}\n",
            "page".bold(),
            self.page.clone().unwrap_or_else(none)
        ));
        out.push_str(&format!("{:<10} {}\n", "scroll".bold(), self.scroll_y));
        out.push_str(&format!(
            "{:<10} {}\n",
            "visible".bold(),
            self.dominant.clone().unwrap_or_else(none)
        ));
        out.push_str(&format!(
            "{:<10} {} lookups, {} rewrites\n",
            "engine".bold(),
            self.lookups,
            self.replaces
        ));

        out.push_str(&format!("\n{}\n", "navigations".bold()));
        for nav in &self.navigations {
            let outcome = match nav.outcome {
                Outcome::Succeeded { attempts } => {
                    format!("{} ({attempts} lookups)", "succeeded".green())
                }
                Outcome::Exhausted { attempts } => {
                    format!("{} ({attempts} lookups)", "exhausted".yellow())
                }
                Outcome::Superseded => "superseded".dimmed().to_string(),
            };
            out.push_str(&format!("  {:<32} -> {}\n", nav.trigger, outcome));
        }

        out.push_str(&format!("\n{}\n", "history".bold()));
        for entry in &self.history {
            let marker = if *entry == self.fragment { "*" } else { " " };
            out.push_str(&format!("  {marker} {entry}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report() -> Report {
        Report {
            fragment: "#/aktuelles#news".into(),
            page: Some("/aktuelles".into()),
            scroll_y: 740.0,
            dominant: Some("news".into()),
            history: vec!["#/".into(), "#/aktuelles#news".into()],
            navigations: vec![NavRecord {
                trigger: "navigate #/aktuelles#news".into(),
                target: Address::new("/aktuelles", Some("news")),
                outcome: Outcome::Succeeded { attempts: 2 },
            }],
            lookups: 2,
            replaces: 0,
        }
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&make_report().to_json().unwrap()).unwrap();
        assert_eq!(json["fragment"], "#/aktuelles#news");
        assert_eq!(json["navigations"][0]["target"], "#/aktuelles#news");
        assert_eq!(json["navigations"][0]["outcome"], "succeeded");
        assert_eq!(json["navigations"][0]["attempts"], 2);
    }

    #[test]
    fn test_render_lists_navigations() {
        let text = make_report().render();
        assert!(text.contains("navigate #/aktuelles#news"));
        assert!(text.contains("succeeded"));
        assert!(text.contains("(2 lookups)"));
        assert!(text.contains("* #/aktuelles#news"));
    }
}
