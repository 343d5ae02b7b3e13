//! Navigation executor - page switch plus retrying scroll.
//!
//! Page content mounts asynchronously after a page switch, so the target
//! element is often missing when navigation starts. The executor polls for
//! it at a fixed interval and gives up after `max_retries` retries.

use std::sync::Arc;

use super::{IntentState, NavigationIntent, Outcome};
use crate::address::SectionRegistry;
use crate::platform::{PageView, Viewport};

/// Drives one intent to its target.
#[derive(Clone)]
pub struct Executor {
    view: Arc<dyn PageView>,
    viewport: Arc<dyn Viewport>,
    registry: Arc<SectionRegistry>,
}

impl Executor {
    pub fn new(
        view: Arc<dyn PageView>,
        viewport: Arc<dyn Viewport>,
        registry: Arc<SectionRegistry>,
    ) -> Self {
        Self {
            view,
            viewport,
            registry,
        }
    }

    #[inline]
    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    /// Run the intent to completion.
    ///
    /// Never fails: a missing element ends as [`Outcome::Exhausted`],
    /// a newer intent as [`Outcome::Superseded`].
    pub async fn execute(&self, intent: &NavigationIntent) -> Outcome {
        let outcome = self.run(intent).await;
        intent.transition(outcome.state());
        outcome
    }

    async fn run(&self, intent: &NavigationIntent) -> Outcome {
        let address = intent.address();
        let options = intent.options();

        if !intent.is_live() {
            return Outcome::Superseded;
        }

        let page = address.page_path();
        if self.view.current_page().as_deref() != Some(page) {
            crate::debug!("nav"; "switching page to {}", page);
            self.view.set_page(page);
        }

        let target = self.registry.resolve(address);
        let Some(section) = target.section() else {
            self.viewport.scroll_to(0.0);
            return Outcome::Succeeded { attempts: 0 };
        };

        let attempts = options.attempts();
        for attempt in 1..=attempts {
            if !intent.is_live() {
                return Outcome::Superseded;
            }
            intent.transition(IntentState::Locating { attempt });

            if let Some(element) = self.viewport.find(section) {
                let y = options.scroll_target(element.top);
                crate::debug!("nav"; "found `{}` on attempt {}, scrolling to {}", section, attempt, y);
                self.viewport.scroll_to(y);
                return Outcome::Succeeded { attempts: attempt };
            }

            if attempt < attempts {
                tokio::time::sleep(options.retry_delay).await;
            }
        }

        Outcome::Exhausted { attempts }
    }
}
