//! `fragnav init`: write a starter config.

use anyhow::Result;
use std::path::Path;

use crate::config::SiteConfig;
use crate::log;

pub fn run_init(path: &Path, force: bool) -> Result<()> {
    SiteConfig::write_template(path, force)?;
    log!("init"; "wrote {}", path.display());
    Ok(())
}
