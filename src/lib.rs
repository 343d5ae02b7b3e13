//! fragnav - page/section navigation carried in the URL fragment.
//!
//! A site's address space has two levels, a **page** and an optional
//! **section** on it, and lives entirely in the fragment
//! (`#/leistungen#messebau`). The engine:
//!
//! - decodes fragments into [`address::Address`] values,
//! - drives the host to an address, retrying the scroll while the page is
//!   still rendering ([`nav::Executor`]),
//! - keeps the fragment in sync with the visible section without feedback
//!   loops ([`nav::ScrollSpy`] + [`nav::Coordinator`]).
//!
//! The host is reached only through the [`platform`] capability traits;
//! [`platform::memory::MemoryBrowser`] implements them in memory.
//!
//! # Module Structure
//!
//! | Module     | Purpose                                           |
//! |------------|---------------------------------------------------|
//! | `address`  | Address value, fragment codec, section registry   |
//! | `platform` | Host capabilities and the in-memory browser       |
//! | `nav`      | Executor, scroll-spy, coordinator, navigator      |
//! | `config`   | `fragnav.toml` loading and validation             |
//! | `sim`      | Scenario replay                                   |
//! | `cli`      | Command-line interface                            |
//! | `logger`   | Colored `log!` / `debug!` macros                  |

pub mod address;
pub mod cli;
pub mod config;
pub mod logger;
pub mod nav;
pub mod platform;
pub mod sim;
