//! Section registry - which section ids exist on which page.
//!
//! Built once from configuration and never mutated afterwards. Lookups
//! are total: unknown pages simply have no sections.

use std::sync::LazyLock;

use rustc_hash::{FxHashMap, FxHashSet};

use super::{Address, normalize_page};

/// Shared empty set returned for unknown pages.
static NO_SECTIONS: LazyLock<FxHashSet<String>> = LazyLock::new(FxHashSet::default);

/// Static `page -> {section id}` mapping.
#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    /// Page path -> section ids (page paths are normalized)
    pages: FxHashMap<String, FxHashSet<String>>,
}

impl SectionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page and its section ids.
    ///
    /// Registering the same page twice merges the section sets.
    pub fn register<I, S>(&mut self, page: &str, sections: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pages
            .entry(normalize_page(page))
            .or_default()
            .extend(sections.into_iter().map(Into::into));
    }

    /// Check if `section` belongs to `page`.
    pub fn is_valid(&self, page: &str, section: &str) -> bool {
        self.pages
            .get(normalize_page(page).as_str())
            .is_some_and(|sections| sections.contains(section))
    }

    /// Section ids of a page; empty for unknown pages.
    pub fn sections_of(&self, page: &str) -> &FxHashSet<String> {
        self.pages
            .get(normalize_page(page).as_str())
            .unwrap_or(&NO_SECTIONS)
    }

    /// Check if a page is registered.
    pub fn contains_page(&self, page: &str) -> bool {
        self.pages.contains_key(normalize_page(page).as_str())
    }

    /// All registered page paths, sorted.
    pub fn pages(&self) -> Vec<&str> {
        let mut pages: Vec<_> = self.pages.keys().map(String::as_str).collect();
        pages.sort_unstable();
        pages
    }

    /// Section ids of a page, sorted (for stable display).
    pub fn sorted_sections_of(&self, page: &str) -> Vec<&str> {
        let mut sections: Vec<_> = self.sections_of(page).iter().map(String::as_str).collect();
        sections.sort_unstable();
        sections
    }

    /// Number of registered pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if no page is registered.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Validate an address, dropping a section the page does not have.
    ///
    /// Never fails: an unknown section degrades to the top of its page
    /// and is reported as a warning.
    pub fn resolve(&self, address: &Address) -> Address {
        match address.section() {
            Some(section) if !self.is_valid(address.page_path(), section) => {
                crate::log!("warning"; "unknown section `{}` on {}, navigating to page top",
                    section, address.page_path());
                address.without_section()
            }
            _ => address.clone(),
        }
    }
}
