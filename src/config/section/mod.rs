//! Configuration section definitions.
//!
//! Each module corresponds to a section in `fragnav.toml`:
//!
//! | Module  | TOML Section | Purpose                              |
//! |---------|--------------|--------------------------------------|
//! | `nav`   | `[nav]`      | Retry budget, header offset, grace   |
//! | `spy`   | `[spy]`      | Visibility thresholds, root margin   |
//! | `pages` | `[[pages]]`  | Pages and their section ids          |

mod nav;
mod pages;
mod spy;

pub use nav::NavConfig;
pub use pages::{PageConfig, validate_pages};
pub use spy::SpyConfig;
