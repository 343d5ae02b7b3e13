//! `fragnav decode` and `fragnav href`.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::address::{self, Address, SectionRegistry};
use crate::config::SiteConfig;

/// How a decoded address relates to the configured pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressStatus {
    Valid,
    /// Page exists, section does not: navigation lands on the page top.
    UnknownSection,
    UnknownPage,
    /// No pages configured.
    Unchecked,
}

impl AddressStatus {
    fn label(self) -> String {
        match self {
            Self::Valid => "valid".green().to_string(),
            Self::UnknownSection => "unknown section".yellow().to_string(),
            Self::UnknownPage => "unknown page".yellow().to_string(),
            Self::Unchecked => "unchecked (no pages configured)".dimmed().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Decoded {
    pub input: String,
    pub page: String,
    pub section: Option<String>,
    pub href: String,
    pub status: AddressStatus,
    /// Where navigation would actually go.
    pub resolved: Address,
}

/// Decode user input and check it against the registry.
pub fn inspect(input: &str, registry: &SectionRegistry) -> Decoded {
    let address = address::decode(&address::fragment_of(input));

    let status = if registry.is_empty() {
        AddressStatus::Unchecked
    } else if !registry.contains_page(address.page_path()) {
        AddressStatus::UnknownPage
    } else {
        match address.section() {
            Some(section) if !registry.is_valid(address.page_path(), section) => {
                AddressStatus::UnknownSection
            }
            _ => AddressStatus::Valid,
        }
    };
    let resolved = match status {
        AddressStatus::UnknownSection => address.without_section(),
        _ => address.clone(),
    };

    Decoded {
        input: input.to_string(),
        page: address.page_path().to_string(),
        section: address.section().map(str::to_string),
        href: address.href(),
        status,
        resolved,
    }
}

pub fn run_decode(input: &str, json: bool, config: &SiteConfig) -> Result<()> {
    let decoded = inspect(input, &config.registry());

    if json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
        return Ok(());
    }

    println!("{:<9} {}", "page".bold(), decoded.page);
    println!(
        "{:<9} {}",
        "section".bold(),
        decoded.section.as_deref().unwrap_or("-")
    );
    println!("{:<9} {}", "href".bold(), decoded.href);
    println!("{:<9} {}", "status".bold(), decoded.status.label());
    if decoded.status == AddressStatus::UnknownSection {
        println!("{:<9} {}", "resolves".bold(), decoded.resolved.href());
    }
    Ok(())
}

pub fn run_href(page: &str, section: Option<&str>, config: &SiteConfig) -> Result<()> {
    let target = Address::new(page, section);
    let registry = config.registry();
    if let Some(section) = target.section()
        && !registry.is_empty()
        && !registry.is_valid(target.page_path(), section)
    {
        crate::log!("warning"; "`{}` is not a section of {}", section, target.page_path());
    }
    println!("{}", target.href());
    Ok(())
}
