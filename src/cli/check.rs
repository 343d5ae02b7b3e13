//! `fragnav check`: validate the config and list the registry.

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::config::SiteConfig;
use crate::log;

/// Config already passed validation while loading; this prints what it holds.
pub fn run_check(config: &SiteConfig) -> Result<()> {
    let registry = config.registry();
    let pages = registry.pages();
    let sections: usize = pages.iter().map(|p| registry.sections_of(p).len()).sum();

    log!("check"; "{}: {} pages, {} sections",
        config.config_path.display(), pages.len(), sections);

    let width = pages.iter().map(|p| p.len()).max().unwrap_or(0);
    for page in pages {
        let ids = registry.sorted_sections_of(page);
        let listed = if ids.is_empty() {
            "(no sections)".dimmed().to_string()
        } else {
            ids.join(", ")
        };
        println!("  {:<width$}  {}", page, listed);
    }

    let options = config.nav_options();
    println!();
    println!(
        "  {} {} lookups every {}ms, window {}ms",
        "nav".bold(),
        options.attempts(),
        options.retry_delay.as_millis(),
        options.budget().saturating_add(config.grace()).as_millis()
    );
    Ok(())
}
