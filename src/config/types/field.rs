//! Config field paths used to tag diagnostics.

use owo_colors::OwoColorize;
use std::borrow::Cow;
use std::fmt;

/// Dotted path of a config field (`nav.retry_delay`, `pages[2].sections`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Cow<'static, str>);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(Cow::Borrowed(path))
    }

    /// Path of an element inside an array of tables.
    pub fn indexed(array: &str, index: usize, field: &str) -> Self {
        Self(Cow::Owned(format!("{array}[{index}].{field}")))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed() {
        assert_eq!(FieldPath::indexed("pages", 2, "sections").as_str(), "pages[2].sections");
        assert_eq!(FieldPath::new("nav.grace").as_str(), "nav.grace");
    }
}
