//! End-to-end replay tests (real time, short delays).

use super::*;
use crate::config::test_parse_config;
use crate::nav::Outcome;

const CONFIG: &str = r#"
[nav]
max_retries = 20
retry_delay = 10

[[pages]]
path = "/"

[[pages]]
path = "/leistungen"
sections = ["messebau", "logistik", "kontakt"]

[[pages]]
path = "/aktuelles"
sections = ["intro", "news", "archiv"]
"#;

const LAYOUTS: &str = r#"
header = 120

[[pages]]
path = "/"

[[pages]]
path = "/leistungen"
mount_delay = 25
sections = [
    { id = "messebau", height = 600 },
    { id = "logistik", height = 600 },
    { id = "kontakt", height = 600 },
]

[[pages]]
path = "/aktuelles"
sections = [
    { id = "intro", height = 700 },
    { id = "news", height = 600 },
    { id = "archiv", height = 600 },
]
"#;

fn replay_steps(steps: &str) -> Report {
    let config = test_parse_config(CONFIG);
    let scenario = Scenario::from_str(&format!("{LAYOUTS}\n{steps}")).unwrap();
    replay(&config, &scenario).unwrap()
}

#[test]
fn test_load_scrolls_to_late_section() {
    let report = replay_steps(
        r##"
[[steps]]
action = "load"
fragment = "#/leistungen#messebau"
"##,
    );

    assert_eq!(report.navigations.len(), 1);
    assert!(report.navigations[0].outcome.is_success());
    assert_eq!(report.page.as_deref(), Some("/leistungen"));
    // messebau top 120 minus header offset 80
    assert_eq!(report.scroll_y, 40.0);
    assert_eq!(report.fragment, "#/leistungen#messebau");
    assert_eq!(report.dominant.as_deref(), Some("messebau"));
}

#[test]
fn test_unknown_section_lands_on_page_top() {
    let report = replay_steps(
        r##"
[[steps]]
action = "load"
fragment = "#/leistungen#unknownsection"
"##,
    );

    assert_eq!(
        report.navigations[0].outcome,
        Outcome::Succeeded { attempts: 0 }
    );
    assert_eq!(report.scroll_y, 0.0);
    assert_eq!(report.lookups, 0);
}

#[test]
fn test_scroll_rewrites_fragment_in_place() {
    let report = replay_steps(
        r##"
[[steps]]
action = "load"
fragment = "#/aktuelles"

[[steps]]
action = "wait"
ms = 30

[[steps]]
action = "scroll"
y = 800
"##,
    );

    assert_eq!(report.fragment, "#/aktuelles#news");
    assert_eq!(report.history, vec!["#/aktuelles#news"]);
    assert_eq!(report.dominant.as_deref(), Some("news"));
}

#[test]
fn test_back_replays_popstate() {
    let report = replay_steps(
        r##"
[[steps]]
action = "load"
fragment = "#/"

[[steps]]
action = "wait"
ms = 20

[[steps]]
action = "navigate"
page = "/aktuelles"
section = "news"

[[steps]]
action = "wait"
ms = 20

[[steps]]
action = "back"
"##,
    );

    let triggers: Vec<_> = report.navigations.iter().map(|n| n.trigger.as_str()).collect();
    assert_eq!(triggers, vec!["load #/", "navigate #/aktuelles#news", "popstate"]);
    assert!(report.navigations.iter().all(|n| n.outcome.is_success()));
    assert_eq!(report.page.as_deref(), Some("/"));
    assert_eq!(report.fragment, "#/");
    assert_eq!(report.history, vec!["#/", "#/aktuelles#news"]);
}

#[test]
fn test_registry_falls_back_to_layouts() {
    let config = test_parse_config("");
    let scenario = Scenario::from_str(&format!(
        "{LAYOUTS}\n[[steps]]\naction = \"navigate\"\npage = \"/aktuelles\"\nsection = \"news\"\n"
    ))
    .unwrap();

    let report = replay(&config, &scenario).unwrap();
    assert!(report.navigations[0].outcome.is_success());
    // news top 820 minus default offset 80
    assert_eq!(report.scroll_y, 740.0);
}
