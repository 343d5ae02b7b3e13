//! Scenario replay against the in-memory browser.
//!
//! ```text
//!  steps ──► Replay ──navigate_to / start──► Navigator ──► MemoryBrowser
//!                                                               │
//!  pump ◄──────────── BrowserEvent (Mounted, Popstate) ─────────┘
//!    └──► page_mounted / on_popstate
//! ```
//!
//! Navigations run concurrently with later steps, exactly like a user
//! clicking again before the page finished rendering.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use super::{NavRecord, Report, Scenario, Step};
use crate::address::{Address, SectionRegistry};
use crate::config::SiteConfig;
use crate::log;
use crate::nav::{Navigator, Outcome};
use crate::platform::{Platform, Viewport};
use crate::platform::memory::{BrowserEvent, MemoryBrowser};

/// Extra quiet time after the longest mount delay.
const SETTLE_MARGIN: Duration = Duration::from_millis(10);

struct Pending {
    trigger: String,
    target: Address,
    handle: JoinHandle<Outcome>,
}

type PendingList = Arc<Mutex<Vec<Pending>>>;

/// Replay a scenario on a fresh current-thread runtime.
pub fn replay(config: &SiteConfig, scenario: &Scenario) -> Result<Report> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(run(config, scenario))
}

/// Replay a scenario on the current runtime.
pub async fn run(config: &SiteConfig, scenario: &Scenario) -> Result<Report> {
    let header = scenario
        .header
        .unwrap_or(f64::from(config.nav.header_offset));
    let (browser, events) = MemoryBrowser::new(scenario.viewport, header, scenario.pages.clone());

    let navigator = Navigator::new(
        Platform::from_shared(browser.clone()),
        Arc::new(registry_for(config, scenario)),
        config.nav_options(),
        config.observe_options(),
        config.grace(),
    );

    let pending: PendingList = Arc::default();
    let pump = tokio::spawn(pump(events, navigator.clone(), Arc::clone(&pending)));

    for step in &scenario.steps {
        crate::debug!("sim"; "{}", step);
        match step {
            Step::Load { fragment } => {
                browser.open(fragment);
                let target = navigator.current_address();
                track(&pending, step, target, navigator.start());
            }
            Step::Navigate { .. } => {
                if let Some(target) = step.target() {
                    let handle = navigator.navigate_to(target.clone(), None);
                    track(&pending, step, target, handle);
                }
            }
            Step::Scroll { y } => browser.user_scroll(*y),
            Step::Wait { ms } => tokio::time::sleep(Duration::from_millis(*ms)).await,
            Step::Back => {
                if !browser.back() {
                    log!("warning"; "step `back`: already at the first history entry");
                }
            }
            Step::Forward => {
                if !browser.forward() {
                    log!("warning"; "step `forward`: already at the last history entry");
                }
            }
        }
        tokio::task::yield_now().await;
    }

    let quiet = Duration::from_millis(scenario.max_mount_delay()) + SETTLE_MARGIN;
    let navigations = settle(&pending, quiet).await;
    pump.abort();

    crate::debug_do! {
        for section in navigator.spy().observed() {
            crate::debug!("spy"; "{}: ratio {:.2}, top {}",
                section.element_id, section.last_visible_ratio, section.last_top);
        }
    }

    Ok(Report {
        fragment: browser.current_fragment(),
        page: browser.mounted_page(),
        scroll_y: browser.scroll_y(),
        dominant: navigator.spy().dominant(),
        history: browser.history(),
        navigations: navigations?,
        lookups: browser.lookups(),
        replaces: browser.replaces(),
    })
}

/// Registry from `[[pages]]`, or from the scenario layouts when none are configured.
fn registry_for(config: &SiteConfig, scenario: &Scenario) -> SectionRegistry {
    if !config.pages.is_empty() {
        return config.registry();
    }
    crate::debug!("sim"; "no [[pages]] configured, using scenario layouts");
    let mut registry = SectionRegistry::new();
    for page in &scenario.pages {
        registry.register(&page.path, page.sections.iter().map(|s| s.id.clone()));
    }
    registry
}

fn track(pending: &PendingList, step: &Step, target: Address, handle: JoinHandle<Outcome>) {
    pending.lock().push(Pending {
        trigger: step.to_string(),
        target,
        handle,
    });
}

/// Forward host events to the navigator.
async fn pump(
    mut events: UnboundedReceiver<BrowserEvent>,
    navigator: Navigator,
    pending: PendingList,
) {
    while let Some(event) = events.recv().await {
        match event {
            BrowserEvent::Mounted(page) => navigator.page_mounted(&page),
            BrowserEvent::Popstate => {
                let target = navigator.current_address();
                let handle = navigator.on_popstate();
                pending.lock().push(Pending {
                    trigger: "popstate".to_string(),
                    target,
                    handle,
                });
            }
        }
    }
}

/// Wait until every navigation finished and no new one shows up.
async fn settle(pending: &PendingList, quiet: Duration) -> Result<Vec<NavRecord>> {
    let mut records = Vec::new();
    loop {
        // late mounts and queued popstates land during the pause
        tokio::time::sleep(quiet).await;

        let batch = std::mem::take(&mut *pending.lock());
        if batch.is_empty() {
            return Ok(records);
        }
        for nav in batch {
            let outcome = nav.handle.await.context("navigation task panicked")?;
            records.push(NavRecord {
                trigger: nav.trigger,
                target: nav.target,
                outcome,
            });
        }
    }
}
