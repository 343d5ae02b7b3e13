//! Fragment codec.
//!
//! - Internal representation: always decoded (human-readable)
//! - Browser boundary: decode on input, encode on output
//!
//! Decoding is total. Every input yields some [`Address`]; whether that
//! address names a known section is the registry's business.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use super::Address;

/// Characters the URL fragment grammar does not allow verbatim.
///
/// `%` is included so that literal percent signs survive a round trip.
const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'%');

/// Section ids additionally escape `#`, the page/section separator.
const SECTION: &AsciiSet = &FRAGMENT.add(b'#');

/// Encode a page and optional section as fragment text (no leading `#`).
///
/// # Examples
/// ```
/// use fragnav::address::encode;
/// assert_eq!(encode("/leistungen", Some("messebau")), "/leistungen#messebau");
/// assert_eq!(encode("/leistungen", None), "/leistungen");
/// ```
pub fn encode(page: &str, section: Option<&str>) -> String {
    let page = utf8_percent_encode(page, SECTION).to_string();
    match section.filter(|s| !s.is_empty()) {
        Some(section) => format!("{page}#{}", utf8_percent_encode(section, SECTION)),
        None => page,
    }
}

/// Anchor target for a page and optional section.
///
/// Usable as a plain `href`, so middle-click and open-in-new-tab keep working.
///
/// # Examples
/// ```
/// use fragnav::address::href;
/// assert_eq!(href("/aktuelles", Some("news")), "#/aktuelles#news");
/// ```
#[inline]
pub fn href(page: &str, section: Option<&str>) -> String {
    format!("#{}", encode(page, section))
}

/// Decode fragment text into an address.
///
/// Strips one leading `#` and splits on the first remaining `#`.
/// An empty page portion means the home page.
///
/// # Examples
/// ```
/// use fragnav::address::decode;
/// let addr = decode("#/leistungen#messebau");
/// assert_eq!(addr.page_path(), "/leistungen");
/// assert_eq!(addr.section(), Some("messebau"));
/// ```
pub fn decode(fragment: &str) -> Address {
    let body = fragment.trim();
    let body = body.strip_prefix('#').unwrap_or(body);
    let (page, section) = body.split_once('#').unwrap_or((body, ""));

    let page = percent_decode_lossless(page);
    let section = percent_decode_lossless(section);
    Address::new(&page, Some(&section))
}

/// Extract fragment text from user input.
///
/// Accepts an absolute URL (`https://example.com/#/a#b`), a bare fragment
/// (`#/a#b`) or encoded address text (`/a#b`).
pub fn fragment_of(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with('#') || trimmed.starts_with('/') {
        return trimmed.to_string();
    }
    match url::Url::parse(trimmed) {
        Ok(parsed) if parsed.has_host() || parsed.scheme() == "file" => {
            parsed.fragment().unwrap_or_default().to_string()
        }
        _ => trimmed.to_string(),
    }
}

/// Percent-decode, keeping the raw text when the escapes are not UTF-8.
fn percent_decode_lossless(s: &str) -> String {
    percent_decode_str(s)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::SectionRegistry;

    #[test]
    fn test_encode_page_and_section() {
        assert_eq!(encode("/leistungen", Some("messebau")), "/leistungen#messebau");
        assert_eq!(encode("/", Some("kontakt")), "/#kontakt");
    }

    #[test]
    fn test_encode_without_section() {
        assert_eq!(encode("/leistungen", None), "/leistungen");
        assert_eq!(encode("/leistungen", Some("")), "/leistungen");
    }

    #[test]
    fn test_encode_single_separator() {
        // a `#` inside the section must not create a second separator
        let encoded = encode("/a", Some("x#y"));
        assert_eq!(encoded.matches('#').count(), 1);
        assert_eq!(encoded, "/a#x%23y");
    }

    #[test]
    fn test_encode_escapes_fragment_grammar_only() {
        assert_eq!(encode("/über uns", Some("team")), "/%C3%BCber%20uns#team");
        // reserved-but-allowed characters stay verbatim
        assert_eq!(encode("/a/b", Some("c-d_e.f")), "/a/b#c-d_e.f");
    }

    #[test]
    fn test_href() {
        assert_eq!(href("/aktuelles", Some("news")), "#/aktuelles#news");
        assert_eq!(href("/", None), "#/");
    }

    #[test]
    fn test_decode_page_and_section() {
        let addr = decode("#/leistungen#messebau");
        assert_eq!(addr.page_path(), "/leistungen");
        assert_eq!(addr.section(), Some("messebau"));
    }

    #[test]
    fn test_decode_without_hash_prefix() {
        let addr = decode("/leistungen#logistik");
        assert_eq!(addr, Address::new("/leistungen", Some("logistik")));
    }

    #[test]
    fn test_decode_defaults_to_home() {
        assert_eq!(decode(""), Address::home());
        assert_eq!(decode("#"), Address::home());
        assert_eq!(decode("#/"), Address::home());
        assert_eq!(decode("##kontakt"), Address::new("/", Some("kontakt")));
    }

    #[test]
    fn test_decode_adds_leading_slash() {
        assert_eq!(decode("#leistungen").page_path(), "/leistungen");
    }

    #[test]
    fn test_decode_empty_section() {
        let addr = decode("#/leistungen#");
        assert!(addr.is_top());
    }

    #[test]
    fn test_decode_splits_on_first_separator() {
        let addr = decode("#/a#b#c");
        assert_eq!(addr.page_path(), "/a");
        assert_eq!(addr.section(), Some("b#c"));
    }

    #[test]
    fn test_decode_percent_escapes() {
        let addr = decode("#/%C3%BCber%20uns#team");
        assert_eq!(addr.page_path(), "/über uns");

        // invalid UTF-8 is preserved verbatim
        assert_eq!(decode("#/bad%FF").page_path(), "/bad%FF");
    }

    #[test]
    fn test_decode_unknown_pair_is_structural() {
        let addr = decode("#/leistungen#unknownsection");
        assert_eq!(addr.page_path(), "/leistungen");
        assert_eq!(addr.section(), Some("unknownsection"));
    }

    #[test]
    fn test_round_trip_registry_pairs() {
        let mut registry = SectionRegistry::new();
        registry.register("/leistungen", ["messebau", "logistik"]);
        registry.register("/aktuelles", ["news", "presse"]);
        registry.register("/", ["hero", "über-uns", "50% rabatt"]);

        for page in registry.pages() {
            for section in registry.sections_of(page) {
                let addr = decode(&encode(page, Some(section.as_str())));
                assert_eq!(addr, Address::new(page, Some(section.as_str())));
            }
            // page only
            let addr = decode(&encode(page, None));
            assert_eq!(addr, Address::page(page));
            assert_eq!(addr.section(), None);
        }
    }

    #[test]
    fn test_round_trip_through_href() {
        let addr = Address::new("/aktuelles", Some("news"));
        assert_eq!(decode(&addr.href()), addr);
    }

    #[test]
    fn test_fragment_of() {
        assert_eq!(
            fragment_of("https://example.com/#/leistungen#messebau"),
            "/leistungen#messebau"
        );
        assert_eq!(fragment_of("https://example.com/"), "");
        assert_eq!(fragment_of("#/aktuelles#news"), "#/aktuelles#news");
        assert_eq!(fragment_of("/aktuelles"), "/aktuelles");
        assert_eq!(fragment_of("aktuelles"), "aktuelles");
    }
}
