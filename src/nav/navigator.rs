//! Navigator - the surface link-like components talk to.
//!
//! ```text
//! link click ----> navigate_to ---push---> AddressBar
//!                      |
//! popstate ------> on_popstate ---+
//!                                 v
//!                            Coordinator ---> Executor ---> PageView / Viewport
//!                                 |
//!                       SuppressionReader
//!                                 v
//! mounted -------> page_mounted -> ScrollSpy ---replace---> AddressBar
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::{Coordinator, Executor, NavOptions, Outcome, ScrollSpy};
use crate::address::{self, Address, SectionRegistry};
use crate::platform::{AddressBar, ObserveOptions, Platform};

/// Facade wiring codec, registry, coordinator and scroll-spy together.
#[derive(Clone)]
pub struct Navigator {
    coordinator: Coordinator,
    spy: ScrollSpy,
    registry: Arc<SectionRegistry>,
    address_bar: Arc<dyn AddressBar>,
    options: NavOptions,
}

impl Navigator {
    /// Wire up a navigator on the given platform.
    pub fn new(
        platform: Platform,
        registry: Arc<SectionRegistry>,
        options: NavOptions,
        observe: ObserveOptions,
        grace: Duration,
    ) -> Self {
        let executor = Executor::new(
            platform.view,
            platform.viewport,
            Arc::clone(&registry),
        );
        let coordinator = Coordinator::with_grace(executor, grace);
        let spy = ScrollSpy::new(
            Arc::clone(&platform.address_bar),
            platform.visibility,
            coordinator.suppression(),
            observe,
        );
        Self {
            coordinator,
            spy,
            registry,
            address_bar: platform.address_bar,
            options,
        }
    }

    /// Default per-navigation options.
    #[inline]
    pub fn options(&self) -> NavOptions {
        self.options
    }

    #[inline]
    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    #[inline]
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    #[inline]
    pub fn spy(&self) -> &ScrollSpy {
        &self.spy
    }

    /// Anchor target for a page and optional section.
    pub fn href(&self, page: &str, section: Option<&str>) -> String {
        address::href(&address::normalize_page(page), section)
    }

    /// Explicit navigation (link click): new history entry, then navigate.
    ///
    /// An unknown section is dropped before the push, so history records
    /// where navigation actually lands.
    pub fn navigate_to(&self, target: Address, options: Option<NavOptions>) -> JoinHandle<Outcome> {
        let target = self.registry.resolve(&target);
        if let Err(e) = self.address_bar.push(&target.href()) {
            crate::debug!("nav"; "history push failed: {}", e);
        }
        self.coordinator
            .request_navigation(target, options.unwrap_or(self.options))
    }

    /// History traversal: navigate to whatever the address bar now shows.
    pub fn on_popstate(&self) -> JoinHandle<Outcome> {
        let target = self.current_address();
        crate::debug!("nav"; "popstate -> {}", target);
        self.coordinator.request_navigation(target, self.options)
    }

    /// Initial load.
    pub fn start(&self) -> JoinHandle<Outcome> {
        let target = self.current_address();
        crate::debug!("nav"; "initial address {}", target);
        self.coordinator.request_navigation(target, self.options)
    }

    /// The view layer finished mounting a page: track its sections.
    pub fn page_mounted(&self, page: &str) {
        let sections = self.registry.sections_of(page);
        if sections.is_empty() {
            self.spy.detach();
            return;
        }
        self.spy.attach(page, sections.iter().cloned());
    }

    /// Address shown in the address bar (home when it cannot be read).
    pub fn current_address(&self) -> Address {
        match self.address_bar.read() {
            Ok(fragment) => address::decode(&fragment),
            Err(e) => {
                crate::debug!("nav"; "cannot read address bar: {}", e);
                Address::home()
            }
        }
    }
}
