//! `[[pages]]` tables: the site's pages and their section ids.
//!
//! # Example
//!
//! ```toml
//! [[pages]]
//! path = "/leistungen"
//! sections = ["messebau", "logistik"]
//!
//! [[pages]]
//! path = "/aktuelles"
//! sections = ["news"]
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::address::{SectionRegistry, normalize_page};
use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    pub path: String,
    /// Section ids in document order.
    #[serde(default)]
    pub sections: Vec<String>,
}

impl PageConfig {
    pub fn new<I, S>(path: &str, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.to_string(),
            sections: sections.into_iter().map(Into::into).collect(),
        }
    }
}

impl SectionRegistry {
    /// Build the registry from `[[pages]]` tables.
    pub fn from_config(pages: &[PageConfig]) -> Self {
        let mut registry = Self::new();
        for page in pages {
            registry.register(&page.path, page.sections.iter().cloned());
        }
        registry
    }
}

/// Validate all page tables.
pub fn validate_pages(pages: &[PageConfig], diag: &mut ConfigDiagnostics) {
    let mut seen: FxHashMap<String, usize> = FxHashMap::default();

    for (i, page) in pages.iter().enumerate() {
        let path_field = || FieldPath::indexed("pages", i, "path");
        let trimmed = page.path.trim();

        if !trimmed.starts_with('/') && !trimmed.is_empty() {
            diag.warn(
                path_field(),
                format!("`{}` has no leading `/`, treated as `{}`", page.path, normalize_page(trimmed)),
            );
        }

        let canonical = normalize_page(trimmed);
        if let Some(first) = seen.insert(canonical.clone(), i) {
            diag.error_with_hint(
                path_field(),
                format!("page `{canonical}` is already defined"),
                format!("merge it into pages[{first}]"),
            );
        }

        validate_sections(i, &page.sections, diag);
    }
}

fn validate_sections(page: usize, sections: &[String], diag: &mut ConfigDiagnostics) {
    let field = || FieldPath::indexed("pages", page, "sections");
    let mut seen = FxHashSet::default();

    for id in sections {
        if id.trim().is_empty() {
            diag.error(field(), "empty section id");
            continue;
        }
        if id.contains('#') {
            diag.error_with_hint(
                field(),
                format!("section id `{id}` contains `#`"),
                "`#` separates page and section in the fragment",
            );
        }
        if id.chars().any(char::is_whitespace) {
            diag.error(field(), format!("section id `{id}` contains whitespace"));
        }
        if !seen.insert(id.as_str()) {
            diag.error(field(), format!("section id `{id}` is listed twice"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_from_config() {
        let pages = [
            PageConfig::new("/leistungen", ["messebau", "logistik"]),
            PageConfig::new("aktuelles/", ["news"]),
        ];
        let registry = SectionRegistry::from_config(&pages);

        assert_eq!(registry.pages(), vec!["/aktuelles", "/leistungen"]);
        assert!(registry.is_valid("/aktuelles", "news"));
        assert!(registry.is_valid("/leistungen", "logistik"));
    }

    #[test]
    fn test_validate_clean_pages() {
        let pages = [
            PageConfig::new("/", Vec::<String>::new()),
            PageConfig::new("/leistungen", ["messebau", "logistik"]),
        ];
        let mut diag = ConfigDiagnostics::new();
        validate_pages(&pages, &mut diag);
        assert!(diag.is_empty());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn test_validate_missing_slash_warns() {
        let pages = [PageConfig::new("leistungen", ["messebau"])];
        let mut diag = ConfigDiagnostics::new();
        validate_pages(&pages, &mut diag);
        assert!(diag.is_empty());
        assert_eq!(diag.warnings()[0].field.as_str(), "pages[0].path");
    }

    #[test]
    fn test_validate_duplicate_pages() {
        let pages = [
            PageConfig::new("/leistungen", ["messebau"]),
            PageConfig::new("/leistungen/", ["logistik"]),
        ];
        let mut diag = ConfigDiagnostics::new();
        validate_pages(&pages, &mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "pages[1].path");
    }

    #[test]
    fn test_validate_bad_section_ids() {
        let pages = [PageConfig::new(
            "/leistungen",
            ["messebau", "", "a#b", "two words", "messebau"],
        )];
        let mut diag = ConfigDiagnostics::new();
        validate_pages(&pages, &mut diag);
        assert_eq!(diag.len(), 4);
        assert!(
            diag.errors()
                .iter()
                .all(|e| e.field.as_str() == "pages[0].sections")
        );
    }
}
