//! In-memory browser.
//!
//! Implements all four capabilities against a simulated document:
//! pages are laid out from [`PageLayout`]s, content mounts after a
//! per-page delay (like a real view layer rendering after a page switch),
//! and visibility is computed from the scroll position.
//!
//! Host-side happenings that the engine must react to (content mounted,
//! back/forward) are published as [`BrowserEvent`]s on a channel, the way
//! a real page would fire DOM events.
//!
//! ```text
//!  document                          viewport
//!  +--------------------+  0
//!  | header             |
//!  +--------------------+  header        +---------------+  scroll_y
//!  | section a          |                | root margin   |
//!  |                    |                |...............|  scroll_y + margin
//!  +--------------------+                |   visible     |
//!  | section b          |                |               |
//!  +--------------------+                +---------------+  scroll_y + height
//! ```

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use tokio::sync::mpsc;

use super::{
    AddressBar, ElementBox, HistoryError, ObserveOptions, PageView, Viewport, Visibility,
    VisibilityEntry, VisibilitySink,
};

// =============================================================================
// Layout
// =============================================================================

/// Layout of one page's content.
#[derive(Debug, Clone, Deserialize)]
pub struct PageLayout {
    /// Page path (e.g. `/leistungen`).
    pub path: String,
    /// Sections in document order.
    #[serde(default)]
    pub sections: Vec<SectionLayout>,
    /// Milliseconds between the page switch and content mount.
    #[serde(default)]
    pub mount_delay: u64,
}

impl PageLayout {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: crate::address::normalize_page(&path.into()),
            sections: Vec::new(),
            mount_delay: 0,
        }
    }

    /// Append a section.
    pub fn section(mut self, id: impl Into<String>, height: f64) -> Self {
        self.sections.push(SectionLayout {
            id: id.into(),
            height,
        });
        self
    }

    /// Set the mount delay.
    pub fn mount_after(mut self, delay: Duration) -> Self {
        self.mount_delay = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

/// One section block.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionLayout {
    pub id: String,
    pub height: f64,
}

/// Host events the engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    /// Content of a page finished mounting.
    Mounted(String),
    /// History traversal (back/forward).
    Popstate,
}

// =============================================================================
// MemoryBrowser
// =============================================================================

/// Simulated browser window.
pub struct MemoryBrowser {
    me: Weak<Self>,
    layouts: FxHashMap<String, PageLayout>,
    viewport_height: f64,
    /// Height of the fixed header; content starts below it.
    header_height: f64,
    events: mpsc::UnboundedSender<BrowserEvent>,
    state: Mutex<BrowserState>,
}

struct BrowserState {
    history: Vec<String>,
    index: usize,
    history_available: bool,
    page: Option<String>,
    mounted: Option<String>,
    /// Bumped on every page switch; stale mounts compare against it.
    mount_seq: u64,
    elements: FxHashMap<String, ElementBox>,
    doc_height: f64,
    scroll_y: f64,
    scrolls: Vec<f64>,
    lookups: usize,
    replaces: usize,
    observer: Option<Observer>,
}

struct Observer {
    ids: Vec<String>,
    options: ObserveOptions,
    sink: Arc<dyn VisibilitySink>,
    buckets: FxHashMap<String, usize>,
}

/// Pending visibility delivery, run after the state lock is released.
type Delivery = Option<(Arc<dyn VisibilitySink>, Vec<VisibilityEntry>)>;

impl MemoryBrowser {
    /// Create a browser with the given viewport and header heights.
    pub fn new(
        viewport_height: f64,
        header_height: f64,
        layouts: impl IntoIterator<Item = PageLayout>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<BrowserEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let layouts = layouts
            .into_iter()
            .map(|l| (crate::address::normalize_page(&l.path), l))
            .collect();

        let browser = Arc::new_cyclic(|me| Self {
            me: me.clone(),
            layouts,
            viewport_height,
            header_height,
            events: tx,
            state: Mutex::new(BrowserState {
                history: Vec::new(),
                index: 0,
                history_available: true,
                page: None,
                mounted: None,
                mount_seq: 0,
                elements: FxHashMap::default(),
                doc_height: viewport_height,
                scroll_y: 0.0,
                scrolls: Vec::new(),
                lookups: 0,
                replaces: 0,
                observer: None,
            }),
        });
        (browser, rx)
    }

    // -------------------------------------------------------------------------
    // User actions
    // -------------------------------------------------------------------------

    /// Open the site at a fragment (initial history entry).
    pub fn open(&self, fragment: &str) {
        let mut state = self.state.lock();
        state.history = vec![normalize_fragment(fragment)];
        state.index = 0;
    }

    /// History back. Returns false at the start of history.
    pub fn back(&self) -> bool {
        self.traverse(-1)
    }

    /// History forward. Returns false at the end of history.
    pub fn forward(&self) -> bool {
        self.traverse(1)
    }

    fn traverse(&self, delta: isize) -> bool {
        {
            let mut state = self.state.lock();
            let Some(next) = state.index.checked_add_signed(delta) else {
                return false;
            };
            if next >= state.history.len() {
                return false;
            }
            state.index = next;
        }
        let _ = self.events.send(BrowserEvent::Popstate);
        true
    }

    /// User scroll. Same effect as a programmatic scroll.
    pub fn user_scroll(&self, y: f64) {
        self.scroll_to(y);
    }

    /// Make the history API fail (private mode, sandboxed frames).
    pub fn set_history_available(&self, available: bool) {
        self.state.lock().history_available = available;
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// Current history entry.
    pub fn current_fragment(&self) -> String {
        let state = self.state.lock();
        state.history.get(state.index).cloned().unwrap_or_default()
    }

    /// Full history stack.
    pub fn history(&self) -> Vec<String> {
        self.state.lock().history.clone()
    }

    /// Every scroll position set so far.
    pub fn scrolls(&self) -> Vec<f64> {
        self.state.lock().scrolls.clone()
    }

    /// Number of element lookups so far.
    pub fn lookups(&self) -> usize {
        self.state.lock().lookups
    }

    /// Number of history replacements so far.
    pub fn replaces(&self) -> usize {
        self.state.lock().replaces
    }

    /// Page whose content is mounted.
    pub fn mounted_page(&self) -> Option<String> {
        self.state.lock().mounted.clone()
    }

    /// Box of a mounted element, without counting as a lookup.
    pub fn element(&self, id: &str) -> Option<ElementBox> {
        self.state.lock().elements.get(id).copied()
    }

    // -------------------------------------------------------------------------
    // Mounting
    // -------------------------------------------------------------------------

    fn schedule_mount(&self, page: String, seq: u64) {
        let Some(layout) = self.layouts.get(&page) else {
            crate::debug!("sim"; "no layout for {}, nothing to mount", page);
            return;
        };
        let delay = Duration::from_millis(layout.mount_delay);

        if delay.is_zero() {
            self.mount(&page, seq);
            return;
        }

        let me = self.me.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(browser) = me.upgrade() {
                browser.mount(&page, seq);
            }
        });
    }

    fn mount(&self, page: &str, seq: u64) {
        let Some(layout) = self.layouts.get(page) else {
            return;
        };
        let delivery = {
            let mut state = self.state.lock();
            if state.mount_seq != seq {
                // superseded by a later page switch
                return;
            }
            let mut top = self.header_height;
            state.elements.clear();
            for section in &layout.sections {
                state
                    .elements
                    .insert(section.id.clone(), ElementBox::new(top, section.height));
                top += section.height;
            }
            state.doc_height = top.max(self.viewport_height);
            state.mounted = Some(page.to_string());
            crate::debug!("sim"; "mounted {} ({} sections)", page, layout.sections.len());
            self.collect_changes(&mut state)
        };
        deliver(delivery);
        let _ = self.events.send(BrowserEvent::Mounted(page.to_string()));
    }

    // -------------------------------------------------------------------------
    // Visibility
    // -------------------------------------------------------------------------

    fn ratio_and_top(&self, state: &BrowserState, margin: f64, b: &ElementBox) -> (f64, f64) {
        let view_top = state.scroll_y + margin;
        let view_bottom = state.scroll_y + self.viewport_height;
        let overlap = (view_bottom.min(b.bottom()) - view_top.max(b.top)).max(0.0);
        let ratio = if b.height > 0.0 {
            (overlap / b.height).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (ratio, b.top - state.scroll_y)
    }

    /// Entries for observed elements whose threshold bucket changed.
    fn collect_changes(&self, state: &mut BrowserState) -> Delivery {
        let observer = state.observer.as_ref()?;
        let margin = observer.options.root_margin_top;

        let mut entries = Vec::new();
        let mut buckets = Vec::new();
        for id in &observer.ids {
            let Some(b) = state.elements.get(id) else {
                continue;
            };
            let (ratio, top) = self.ratio_and_top(state, margin, b);
            let bucket = observer.options.bucket(ratio);
            if observer.buckets.get(id) != Some(&bucket) {
                entries.push(VisibilityEntry::new(id.clone(), ratio, top));
                buckets.push((id.clone(), bucket));
            }
        }

        let observer = state.observer.as_mut()?;
        observer.buckets.extend(buckets);
        if entries.is_empty() {
            return None;
        }
        Some((Arc::clone(&observer.sink), entries))
    }
}

fn deliver(delivery: Delivery) {
    if let Some((sink, entries)) = delivery {
        sink.on_visibility(&entries);
    }
}

fn normalize_fragment(fragment: &str) -> String {
    if fragment.is_empty() || fragment.starts_with('#') {
        fragment.to_string()
    } else {
        format!("#{fragment}")
    }
}

// =============================================================================
// Capabilities
// =============================================================================

impl AddressBar for MemoryBrowser {
    fn read(&self) -> Result<String, HistoryError> {
        let state = self.state.lock();
        if !state.history_available {
            return Err(HistoryError::Unavailable);
        }
        Ok(state.history.get(state.index).cloned().unwrap_or_default())
    }

    fn replace(&self, fragment: &str) -> Result<(), HistoryError> {
        let mut state = self.state.lock();
        if !state.history_available {
            return Err(HistoryError::Unavailable);
        }
        let fragment = normalize_fragment(fragment);
        let index = state.index;
        match state.history.get_mut(index) {
            Some(entry) => *entry = fragment,
            None => state.history.push(fragment),
        }
        state.replaces += 1;
        Ok(())
    }

    fn push(&self, fragment: &str) -> Result<(), HistoryError> {
        let mut state = self.state.lock();
        if !state.history_available {
            return Err(HistoryError::Unavailable);
        }
        let keep = if state.history.is_empty() {
            0
        } else {
            state.index + 1
        };
        state.history.truncate(keep);
        state.history.push(normalize_fragment(fragment));
        state.index = state.history.len() - 1;
        Ok(())
    }
}

impl PageView for MemoryBrowser {
    fn current_page(&self) -> Option<String> {
        self.state.lock().page.clone()
    }

    fn set_page(&self, page: &str) {
        let page = crate::address::normalize_page(page);
        let seq = {
            let mut state = self.state.lock();
            state.page = Some(page.clone());
            state.mounted = None;
            state.mount_seq += 1;
            state.elements.clear();
            state.doc_height = self.viewport_height;
            state.scroll_y = 0.0;
            // old content is gone, and with it the old observation targets
            state.observer = None;
            state.mount_seq
        };
        crate::debug!("sim"; "page switch to {}", page);
        self.schedule_mount(page, seq);
    }
}

impl Viewport for MemoryBrowser {
    fn find(&self, id: &str) -> Option<ElementBox> {
        let mut state = self.state.lock();
        state.lookups += 1;
        state.elements.get(id).copied()
    }

    fn scroll_to(&self, y: f64) {
        let delivery = {
            let mut state = self.state.lock();
            let max = (state.doc_height - self.viewport_height).max(0.0);
            state.scroll_y = y.clamp(0.0, max);
            let scrolled = state.scroll_y;
            state.scrolls.push(scrolled);
            self.collect_changes(&mut state)
        };
        deliver(delivery);
    }

    fn scroll_y(&self) -> f64 {
        self.state.lock().scroll_y
    }
}

impl Visibility for MemoryBrowser {
    fn observe(&self, ids: &[String], options: &ObserveOptions, sink: Arc<dyn VisibilitySink>) {
        let delivery = {
            let mut state = self.state.lock();
            state.observer = Some(Observer {
                ids: ids.to_vec(),
                options: options.clone(),
                sink,
                buckets: FxHashMap::default(),
            });
            self.collect_changes(&mut state)
        };
        deliver(delivery);
    }

    fn disconnect(&self) {
        self.state.lock().observer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Collect(Mutex<Vec<VisibilityEntry>>);

    impl VisibilitySink for Collect {
        fn on_visibility(&self, entries: &[VisibilityEntry]) {
            self.0.lock().extend_from_slice(entries);
        }
    }

    fn make_browser() -> Arc<MemoryBrowser> {
        let layout = PageLayout::new("/leistungen")
            .section("messebau", 600.0)
            .section("logistik", 600.0);
        let (browser, _rx) = MemoryBrowser::new(800.0, 100.0, [layout]);
        browser
    }

    #[test]
    fn test_history_push_and_replace() {
        let browser = make_browser();
        browser.open("#/");
        browser.push("#/leistungen").unwrap();
        browser.replace("#/leistungen#logistik").unwrap();

        assert_eq!(browser.history(), vec!["#/", "#/leistungen#logistik"]);
        assert_eq!(browser.current_fragment(), "#/leistungen#logistik");
        assert_eq!(browser.replaces(), 1);
    }

    #[test]
    fn test_history_unavailable() {
        let browser = make_browser();
        browser.set_history_available(false);
        assert_eq!(browser.read(), Err(HistoryError::Unavailable));
        assert_eq!(browser.push("#/x"), Err(HistoryError::Unavailable));
        assert_eq!(browser.replace("#/x"), Err(HistoryError::Unavailable));
    }

    #[test]
    fn test_push_truncates_forward_history() {
        let browser = make_browser();
        browser.open("#/");
        browser.push("#/a").unwrap();
        browser.push("#/b").unwrap();
        assert!(browser.back());
        browser.push("#/c").unwrap();
        assert_eq!(browser.history(), vec!["#/", "#/a", "#/c"]);
        assert!(!browser.forward());
    }

    #[test]
    fn test_zero_delay_mounts_immediately() {
        let browser = make_browser();
        browser.set_page("/leistungen");

        assert_eq!(browser.mounted_page().as_deref(), Some("/leistungen"));
        assert_eq!(
            browser.element("messebau"),
            Some(ElementBox::new(100.0, 600.0))
        );
        assert_eq!(
            browser.element("logistik"),
            Some(ElementBox::new(700.0, 600.0))
        );
    }

    #[test]
    fn test_scroll_clamped_to_document() {
        let browser = make_browser();
        browser.set_page("/leistungen");
        browser.scroll_to(5000.0);
        // document is 1300 high, viewport 800
        assert_eq!(browser.scroll_y(), 500.0);
        browser.scroll_to(-10.0);
        assert_eq!(browser.scroll_y(), 0.0);
    }

    #[test]
    fn test_observe_reports_threshold_crossings_only() {
        let browser = make_browser();
        browser.set_page("/leistungen");

        let sink = Arc::new(Collect(Mutex::new(Vec::new())));
        let ids = vec!["messebau".to_string(), "logistik".to_string()];
        browser.observe(&ids, &ObserveOptions::default(), sink.clone());

        // initial delivery: both mounted elements
        assert_eq!(sink.0.lock().len(), 2);
        sink.0.lock().clear();

        // one pixel does not cross any threshold
        browser.scroll_to(1.0);
        assert!(sink.0.lock().is_empty());

        browser.scroll_to(500.0);
        let entries = sink.0.lock().clone();
        let logistik = entries.iter().find(|e| e.id == "logistik").unwrap();
        assert_eq!(logistik.ratio, 1.0);
        assert_eq!(logistik.top, 200.0);
    }
}
