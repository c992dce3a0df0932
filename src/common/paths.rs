use anyhow::{Context, Result};
use std::path::PathBuf;

/// Centralized path management for pyroclast.
/// This module provides a single source of truth for all application paths.

/// File name the vkBasalt layer looks for. Any other name is invisible
/// to the consumer.
pub const CONFIG_FILE_NAME: &str = "vkBasalt.conf";

/// Sample config shipped by distro packages, used to seed a fresh setup.
pub const EXAMPLE_CONFIG: &str = "/usr/share/vkBasalt/vkBasalt.conf.example";

/// Get the pyroclast config directory (~/.config/pyroclast)
pub fn pyroclast_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("pyroclast");

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("creating config directory at {}", config_dir.display()))?;

    Ok(config_dir)
}

/// Path of the global vkBasalt config (~/.config/vkBasalt/vkBasalt.conf).
/// The file and its directory are not created here.
pub fn global_config_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("vkBasalt")
        .join(CONFIG_FILE_NAME))
}

/// The vkBasalt.conf in the current working directory.
pub fn working_dir_config_path() -> Result<PathBuf> {
    Ok(std::env::current_dir()
        .context("Unable to determine working directory")?
        .join(CONFIG_FILE_NAME))
}

/// Main pyroclast data directory (~/pyroclast)
pub fn data_dir() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Unable to determine home directory")?
        .join("pyroclast"))
}

/// Where config backups are archived unless overridden in pyroclast.toml.
pub fn default_backup_root() -> Result<PathBuf> {
    Ok(data_dir()?.join("backupfiles"))
}

/// Create the pyroclast data tree. Pre-existing directories are not an
/// error; this is safe to run on every invocation.
pub fn ensure_data_tree() -> Result<()> {
    let main = data_dir()?;
    for dir in [
        main.clone(),
        main.join("backupfiles"),
        main.join("shaders"),
        main.join("textures"),
        main.join("lut"),
    ] {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating data directory at {}", dir.display()))?;
    }
    Ok(())
}
