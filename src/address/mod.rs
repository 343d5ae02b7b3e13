//! Two-level site addresses carried in the URL fragment.
//!
//! An [`Address`] names a page and, optionally, a section on that page.
//! It is the only value the navigation engine passes around.
//!
//! # Wire format
//!
//! ```text
//! #/leistungen#messebau     ->  Address { page: "/leistungen", section: Some("messebau") }
//! #/leistungen              ->  Address { page: "/leistungen", section: None }
//! #                         ->  Address { page: "/",           section: None }
//! ```
//!
//! # Module Structure
//!
//! - [`codec`]: fragment <-> [`Address`] conversion (total, never fails)
//! - [`registry`]: static `page -> {section}` map used for validation

pub mod codec;
pub mod registry;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use codec::{decode, encode, fragment_of, href};
pub use registry::SectionRegistry;

/// Page + optional section.
///
/// Invariants:
/// - `page` always starts with `/` (`/` is the home page)
/// - `page` never ends with `/` unless it is the home page
/// - `section` is never empty
///
/// Addresses are immutable values; every helper returns a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    page: Arc<str>,
    section: Option<Arc<str>>,
}

impl Address {
    /// Create an address, normalizing the page path.
    pub fn new(page: &str, section: Option<&str>) -> Self {
        let section = section
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Arc::from);
        Self {
            page: Arc::from(normalize_page(page)),
            section,
        }
    }

    /// Address of the top of a page.
    pub fn page(page: &str) -> Self {
        Self::new(page, None)
    }

    /// The home page (`/`).
    pub fn home() -> Self {
        Self::page("/")
    }

    /// Page path (always starts with `/`).
    #[inline]
    pub fn page_path(&self) -> &str {
        &self.page
    }

    /// Section id, if any.
    #[inline]
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// True when the address points at the top of its page.
    #[inline]
    pub fn is_top(&self) -> bool {
        self.section.is_none()
    }

    /// Same page, different section.
    pub fn with_section(&self, section: &str) -> Self {
        Self::new(&self.page, Some(section))
    }

    /// Same page, no section.
    pub fn without_section(&self) -> Self {
        Self {
            page: Arc::clone(&self.page),
            section: None,
        }
    }

    /// Check if both addresses are on the same page.
    #[inline]
    pub fn same_page(&self, other: &Self) -> bool {
        self.page == other.page
    }

    /// Encoded fragment text without the leading `#`.
    pub fn encode(&self) -> String {
        codec::encode(&self.page, self.section())
    }

    /// Anchor target (`#` + encoded fragment).
    pub fn href(&self) -> String {
        codec::href(&self.page, self.section())
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::home()
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.section() {
            Some(section) => write!(f, "{}#{}", self.page, section),
            None => write!(f, "{}", self.page),
        }
    }
}

impl From<&str> for Address {
    fn from(fragment: &str) -> Self {
        codec::decode(fragment)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.href().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(codec::decode(&s))
    }
}

/// Canonical page path: leading `/`, no trailing `/` (except home).
pub fn normalize_page(page: &str) -> String {
    let trimmed = page.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_page() {
        assert_eq!(Address::page("leistungen").page_path(), "/leistungen");
        assert_eq!(Address::page("/leistungen/").page_path(), "/leistungen");
        assert_eq!(Address::page("").page_path(), "/");
        assert_eq!(Address::page("  /  ").page_path(), "/");
    }

    #[test]
    fn test_empty_section_is_none() {
        let addr = Address::new("/kontakt", Some(""));
        assert!(addr.is_top());
        assert_eq!(addr.section(), None);
    }

    #[test]
    fn test_with_and_without_section() {
        let top = Address::page("/leistungen");
        let messebau = top.with_section("messebau");

        assert_eq!(messebau.section(), Some("messebau"));
        assert!(messebau.same_page(&top));
        assert_eq!(messebau.without_section(), top);
        // original value untouched
        assert!(top.is_top());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Address::new("/leistungen", Some("messebau")).to_string(),
            "/leistungen#messebau"
        );
        assert_eq!(Address::home().to_string(), "/");
    }

    #[test]
    fn test_serialize_deserialize() {
        let addr = Address::new("/aktuelles", Some("news"));
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, r##""#/aktuelles#news""##);

        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, addr);
    }
}
