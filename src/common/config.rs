use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::common::paths;

fn default_flatpak_pkg() -> String {
    "org.vkbasalt.vkbasalt".to_string()
}

/// Persistent application settings (~/.config/pyroclast/pyroclast.toml).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// AUR helper to use on Arch systems. No default: building AUR
    /// packages is an explicit user choice.
    #[serde(default)]
    pub aur_helper: Option<String>,
    /// Overrides the backup archive location (~/pyroclast/backupfiles).
    #[serde(default)]
    pub backup_root: Option<PathBuf>,
    #[serde(default = "default_flatpak_pkg")]
    pub flatpak_pkg: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            aur_helper: None,
            backup_root: None,
            flatpak_pkg: default_flatpak_pkg(),
        }
    }
}

fn config_file_path() -> Result<PathBuf> {
    Ok(paths::pyroclast_config_dir()?.join("pyroclast.toml"))
}

impl Config {
    /// Load the config from disk. If the config file does not exist,
    /// create a default config file and return the default.
    pub fn load() -> Result<Config> {
        let cfg_path = config_file_path()?;
        if !cfg_path.exists() {
            let default = Config::default();
            let toml = toml::to_string_pretty(&default).context("serializing default config")?;
            fs::write(&cfg_path, toml)
                .with_context(|| format!("writing default config to {}", cfg_path.display()))?;
            return Ok(default);
        }
        let s = fs::read_to_string(&cfg_path)
            .with_context(|| format!("reading config {}", cfg_path.display()))?;
        let c: Config = toml::from_str(&s).context("parsing config toml")?;
        Ok(c)
    }

    /// Save the current config to disk (overwrites file)
    pub fn save(&self) -> Result<()> {
        let cfg_path = config_file_path()?;
        let toml = toml::to_string_pretty(self).context("serializing config to toml")?;
        fs::write(cfg_path, toml).context("writing config file")?;
        Ok(())
    }

    /// Effective backup root: the configured override or the default.
    pub fn backup_root(&self) -> Result<PathBuf> {
        match &self.backup_root {
            Some(root) => Ok(root.clone()),
            None => paths::default_backup_root(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let default = Config::default();
        let serialized = toml::to_string_pretty(&default).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.aur_helper, None);
        assert_eq!(parsed.backup_root, None);
        assert_eq!(parsed.flatpak_pkg, "org.vkbasalt.vkbasalt");
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let parsed: Config = toml::from_str("aur_helper = \"paru\"").unwrap();
        assert_eq!(parsed.aur_helper.as_deref(), Some("paru"));
        assert_eq!(parsed.flatpak_pkg, "org.vkbasalt.vkbasalt");
        assert_eq!(parsed.backup_root, None);
    }
}
