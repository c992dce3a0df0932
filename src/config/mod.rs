//! Config resolution, backup and atomic writing for vkBasalt.conf.

pub mod backup;
pub mod document;
pub mod resolver;
pub mod save;
pub mod writer;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::common::paths;
use crate::ui;

/// Seed the global config from the distro-shipped example file when no
/// user config exists yet. Does nothing when either side is missing.
pub fn seed_global_config() -> Result<()> {
    let target = paths::global_config_path()?;
    if target.exists() {
        return Ok(());
    }

    let example = Path::new(paths::EXAMPLE_CONFIG);
    if !example.exists() {
        ui::warn(&format!(
            "no example config at {}, skipping initial config setup",
            example.display()
        ));
        return Ok(());
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory at {}", parent.display()))?;
    }
    fs::copy(example, &target)
        .with_context(|| format!("seeding config at {}", target.display()))?;
    ui::success(&format!("created initial config at {}", target.display()));
    Ok(())
}
