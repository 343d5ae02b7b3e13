//! Scroll-spy - reflect the dominant visible section in the URL.
//!
//! # Dominance
//!
//! Among sections that are at least partially visible, the dominant one has
//! reached the most visibility thresholds. Ties go to the section whose top
//! edge is higher in the viewport, then to the smaller id. Comparing
//! threshold buckets instead of raw ratios keeps the choice stable while two
//! sections share the screen.
//!
//! # Writes
//!
//! Rewrites always *replace* the current history entry, never push, and are
//! skipped while the suppression window is open. A change seen during the
//! window is deferred and re-checked on the next callback.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::SuppressionReader;
use crate::address::{self, Address};
use crate::platform::{AddressBar, ObserveOptions, Visibility, VisibilityEntry, VisibilitySink};

/// One tracked section element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservedSection {
    pub element_id: String,
    pub last_visible_ratio: f64,
    /// Last reported top edge, relative to the viewport.
    pub last_top: f64,
}

impl ObservedSection {
    fn new(element_id: String) -> Self {
        Self {
            element_id,
            last_visible_ratio: 0.0,
            last_top: 0.0,
        }
    }
}

#[derive(Debug, Default)]
struct SpyState {
    page: Option<String>,
    sections: FxHashMap<String, ObservedSection>,
    dominant: Option<String>,
    /// A dominance change arrived while suppressed.
    deferred: bool,
}

/// Visibility observer that rewrites the fragment.
#[derive(Clone)]
pub struct ScrollSpy {
    inner: Arc<SpyInner>,
}

struct SpyInner {
    address_bar: Arc<dyn AddressBar>,
    visibility: Arc<dyn Visibility>,
    suppression: SuppressionReader,
    options: ObserveOptions,
    state: Mutex<SpyState>,
}

impl ScrollSpy {
    pub fn new(
        address_bar: Arc<dyn AddressBar>,
        visibility: Arc<dyn Visibility>,
        suppression: SuppressionReader,
        options: ObserveOptions,
    ) -> Self {
        Self {
            inner: Arc::new(SpyInner {
                address_bar,
                visibility,
                suppression,
                options,
                state: Mutex::new(SpyState::default()),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Tracking
    // -------------------------------------------------------------------------

    /// Track the sections of a freshly displayed page.
    pub fn attach<I, S>(&self, page: &str, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        ids.sort_unstable();
        ids.dedup();

        {
            let mut state = self.inner.state.lock();
            state.page = Some(address::normalize_page(page));
            state.sections = ids
                .iter()
                .map(|id| (id.clone(), ObservedSection::new(id.clone())))
                .collect();
            state.dominant = None;
            state.deferred = false;
        }
        crate::debug!("spy"; "observing {} sections on {}", ids.len(), page);
        self.subscribe(&ids);
    }

    /// Stop tracking everything.
    pub fn detach(&self) {
        *self.inner.state.lock() = SpyState::default();
        self.inner.visibility.disconnect();
    }

    /// Start tracking one more element of the current page.
    pub fn mount(&self, id: &str) {
        let ids = {
            let mut state = self.inner.state.lock();
            state
                .sections
                .entry(id.to_string())
                .or_insert_with(|| ObservedSection::new(id.to_string()));
            tracked_ids(&state)
        };
        self.subscribe(&ids);
    }

    /// Stop tracking an element that left the document.
    pub fn unmount(&self, id: &str) {
        let ids = {
            let mut state = self.inner.state.lock();
            state.sections.remove(id);
            if state.dominant.as_deref() == Some(id) {
                state.dominant = None;
            }
            tracked_ids(&state)
        };
        self.subscribe(&ids);
    }

    fn subscribe(&self, ids: &[String]) {
        if ids.is_empty() {
            self.inner.visibility.disconnect();
            return;
        }
        let sink: Arc<dyn VisibilitySink> = Arc::new(self.clone());
        self.inner.visibility.observe(ids, &self.inner.options, sink);
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// Page whose sections are tracked.
    pub fn page(&self) -> Option<String> {
        self.inner.state.lock().page.clone()
    }

    /// Current dominant section.
    pub fn dominant(&self) -> Option<String> {
        self.inner.state.lock().dominant.clone()
    }

    /// Snapshot of tracked sections, sorted by id.
    pub fn observed(&self) -> Vec<ObservedSection> {
        let state = self.inner.state.lock();
        let mut sections: Vec<_> = state.sections.values().cloned().collect();
        sections.sort_by(|a, b| a.element_id.cmp(&b.element_id));
        sections
    }

    // -------------------------------------------------------------------------
    // Callback
    // -------------------------------------------------------------------------

    /// Handle a batch of visibility entries.
    ///
    /// Returns the fragment written to the address bar, if any.
    pub fn on_entries(&self, entries: &[VisibilityEntry]) -> Option<String> {
        let target = {
            let mut state = self.inner.state.lock();
            for entry in entries {
                if let Some(section) = state.sections.get_mut(&entry.id) {
                    section.last_visible_ratio = entry.ratio;
                    section.last_top = entry.top;
                }
            }

            let dominant = self.dominant_of(&state.sections);
            let changed = dominant != state.dominant;
            state.dominant.clone_from(&dominant);

            if !changed && !state.deferred {
                return None;
            }
            let Some(id) = dominant else {
                state.deferred = false;
                return None;
            };
            if self.inner.suppression.is_active() {
                crate::debug!("spy"; "suppressed rewrite to `{}`", id);
                state.deferred = true;
                return None;
            }
            state.deferred = false;
            Address::new(state.page.as_deref()?, Some(id.as_str()))
        };

        self.rewrite(&target)
    }

    fn dominant_of(&self, sections: &FxHashMap<String, ObservedSection>) -> Option<String> {
        let options = &self.inner.options;
        sections
            .values()
            .filter(|s| s.last_visible_ratio > 0.0)
            .max_by(|a, b| {
                options
                    .bucket(a.last_visible_ratio)
                    .cmp(&options.bucket(b.last_visible_ratio))
                    .then_with(|| b.last_top.total_cmp(&a.last_top))
                    .then_with(|| b.element_id.cmp(&a.element_id))
            })
            .map(|s| s.element_id.clone())
    }

    fn rewrite(&self, target: &Address) -> Option<String> {
        let bar = &self.inner.address_bar;
        if let Ok(current) = bar.read()
            && address::decode(&current) == *target
        {
            return None;
        }

        let fragment = target.href();
        match bar.replace(&fragment) {
            Ok(()) => {
                crate::debug!("spy"; "fragment -> {}", fragment);
                Some(fragment)
            }
            Err(e) => {
                crate::debug!("spy"; "cannot rewrite fragment: {}", e);
                None
            }
        }
    }
}

impl VisibilitySink for ScrollSpy {
    fn on_visibility(&self, entries: &[VisibilityEntry]) {
        self.on_entries(entries);
    }
}

fn tracked_ids(state: &SpyState) -> Vec<String> {
    let mut ids: Vec<_> = state.sections.keys().cloned().collect();
    ids.sort_unstable();
    ids
}
