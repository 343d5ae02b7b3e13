//! Capabilities the navigation engine needs from its host.
//!
//! The engine never touches browser globals. Everything it reads or writes
//! goes through four small traits, so the coordination logic runs the same
//! against a real page or the in-memory [`memory::MemoryBrowser`].
//!
//! | Trait          | Browser counterpart                               |
//! |----------------|---------------------------------------------------|
//! | [`AddressBar`] | `location.hash`, `history.pushState/replaceState` |
//! | [`PageView`]   | view-layer "current page" state                   |
//! | [`Viewport`]   | `getElementById`, `window.scrollTo`               |
//! | [`Visibility`] | `IntersectionObserver`                            |

pub mod memory;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// History / location access failures.
///
/// Never fatal: navigation keeps its in-memory state when the URL
/// cannot be read or written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("history API unavailable")]
    Unavailable,

    #[error("history entry rejected: {0}")]
    Rejected(String),
}

// =============================================================================
// Capabilities
// =============================================================================

/// Read and write the URL fragment.
pub trait AddressBar: Send + Sync {
    /// Current fragment, including the leading `#` (empty when unset).
    fn read(&self) -> Result<String, HistoryError>;

    /// Replace the current history entry (scroll-spy updates).
    fn replace(&self, fragment: &str) -> Result<(), HistoryError>;

    /// Push a new history entry (explicit link clicks).
    fn push(&self, fragment: &str) -> Result<(), HistoryError>;
}

/// The view layer's "current page" state.
pub trait PageView: Send + Sync {
    /// Page currently displayed, if any.
    fn current_page(&self) -> Option<String>;

    /// Request a page switch. Content mounts later, asynchronously.
    fn set_page(&self, page: &str);
}

/// Element lookup and scrolling.
pub trait Viewport: Send + Sync {
    /// Locate a mounted element by id.
    fn find(&self, id: &str) -> Option<ElementBox>;

    /// Scroll the document to an absolute vertical offset.
    fn scroll_to(&self, y: f64);

    /// Current vertical scroll offset.
    fn scroll_y(&self) -> f64;
}

/// Element visibility subscriptions.
pub trait Visibility: Send + Sync {
    /// Observe `ids`, replacing any previous subscription.
    ///
    /// Implementations deliver an initial batch of entries and then one
    /// entry per element whenever it crosses one of `options.thresholds`.
    fn observe(&self, ids: &[String], options: &ObserveOptions, sink: Arc<dyn VisibilitySink>);

    /// Drop the current subscription.
    fn disconnect(&self);
}

/// Receiver of visibility changes.
pub trait VisibilitySink: Send + Sync {
    fn on_visibility(&self, entries: &[VisibilityEntry]);
}

// =============================================================================
// Data
// =============================================================================

/// Document-relative element box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementBox {
    /// Offset of the element's top edge from the document top.
    pub top: f64,
    pub height: f64,
}

impl ElementBox {
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// One visibility observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibilityEntry {
    /// Element id.
    pub id: String,
    /// Visible fraction of the element, `0.0..=1.0`.
    pub ratio: f64,
    /// Element top relative to the viewport top (negative when above).
    pub top: f64,
}

impl VisibilityEntry {
    pub fn new(id: impl Into<String>, ratio: f64, top: f64) -> Self {
        Self {
            id: id.into(),
            ratio,
            top,
        }
    }
}

/// Intersection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserveOptions {
    /// Ascending ratios at which a change is reported.
    pub thresholds: Vec<f64>,
    /// Pixels excluded from the top of the viewport (fixed header).
    pub root_margin_top: f64,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            thresholds: vec![0.0, 0.25, 0.5, 0.75, 1.0],
            root_margin_top: 0.0,
        }
    }
}

impl ObserveOptions {
    /// Number of thresholds a ratio has reached.
    ///
    /// Elements that are not visible at all are always bucket 0.
    pub fn bucket(&self, ratio: f64) -> usize {
        if ratio <= 0.0 {
            return 0;
        }
        self.thresholds.iter().filter(|&&t| ratio >= t).count()
    }
}

/// The four capabilities bundled together.
#[derive(Clone)]
pub struct Platform {
    pub address_bar: Arc<dyn AddressBar>,
    pub view: Arc<dyn PageView>,
    pub viewport: Arc<dyn Viewport>,
    pub visibility: Arc<dyn Visibility>,
}

impl Platform {
    /// Use one object for all four capabilities.
    pub fn from_shared<T>(host: Arc<T>) -> Self
    where
        T: AddressBar + PageView + Viewport + Visibility + 'static,
    {
        Self {
            address_bar: host.clone(),
            view: host.clone(),
            viewport: host.clone(),
            visibility: host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket() {
        let options = ObserveOptions::default();
        assert_eq!(options.bucket(0.0), 0);
        assert_eq!(options.bucket(0.1), 1);
        assert_eq!(options.bucket(0.25), 2);
        assert_eq!(options.bucket(0.6), 3);
        assert_eq!(options.bucket(0.8), 4);
        assert_eq!(options.bucket(1.0), 5);
    }

    #[test]
    fn test_bucket_without_zero_threshold() {
        let options = ObserveOptions {
            thresholds: vec![0.5, 1.0],
            root_margin_top: 0.0,
        };
        assert_eq!(options.bucket(0.3), 0);
        assert_eq!(options.bucket(0.5), 1);
    }

    #[test]
    fn test_element_box_bottom() {
        assert_eq!(ElementBox::new(100.0, 250.0).bottom(), 350.0);
    }
}
