mod common;
mod config;
mod error;
mod pkg;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use crate::common::config::Config;
use crate::common::distro::DistroFamily;
use crate::common::paths;
use crate::config::document::SettingsDocument;
use crate::config::resolver::{self, ConfigCandidate};
use crate::config::save;
use crate::error::PyroclastError;
use crate::pkg::PackageManagerResult;
use crate::pkg::orchestrator::{self, InstallMode, Options};

/// pyroclast main parser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pause for two seconds after each log line
    #[arg(short, long, global = true)]
    slow: bool,

    /// Uninstall vkBasalt instead of installing it
    #[arg(long)]
    uninstall: bool,

    /// Install/uninstall through Flatpak instead of the native manager
    #[arg(long)]
    flatpak: bool,

    /// Flatpak package id (defaults to the configured org.vkbasalt.vkbasalt)
    #[arg(long, requires = "flatpak")]
    flatpak_pkg: Option<String>,

    /// Extra path to check for an existing vkBasalt installation
    #[arg(long)]
    custom_path: Option<PathBuf>,

    /// AUR helper to use on Arch systems (yay, paru, pikaur, trizen)
    #[arg(long)]
    aur_helper: Option<String>,

    /// Skip detection and assume this distribution family
    #[arg(long)]
    force_distro: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect and edit the effective vkBasalt config
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show which config file is authoritative and what it shadows
    Path {
        /// Per-application override config to consider
        #[arg(long)]
        per_app: Option<PathBuf>,
        /// Also consider vkBasalt.conf in the working directory
        #[arg(long)]
        workdir: bool,
    },
    /// Set a key in the effective config, backing the old file up first
    Set {
        key: String,
        value: String,
        /// Per-application override config to consider
        #[arg(long)]
        per_app: Option<PathBuf>,
        /// Also consider vkBasalt.conf in the working directory
        #[arg(long)]
        workdir: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    ui::set_slow(cli.slow);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            ui::error(&format!("{err:#}"));
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let cfg = Config::load()?;

    match cli.command {
        Some(Commands::Config { command }) => {
            run_config(command, &cfg)?;
            Ok(0)
        }
        None => run_installer(&cli, &cfg),
    }
}

fn run_installer(cli: &Cli, cfg: &Config) -> Result<i32> {
    let mode = if cli.uninstall {
        InstallMode::Uninstall
    } else {
        InstallMode::Install
    };

    let force_distro = cli
        .force_distro
        .as_deref()
        .map(|name| {
            DistroFamily::from_name(name)
                .ok_or_else(|| PyroclastError::UnknownPlatform(name.to_string()))
        })
        .transpose()?;

    let opts = Options {
        custom_path: cli.custom_path.clone(),
        aur_helper: cli.aur_helper.clone(),
        flatpak: cli.flatpak,
        force_distro,
    };

    let mut effective_cfg = cfg.clone();
    if let Some(pkg_id) = &cli.flatpak_pkg {
        effective_cfg.flatpak_pkg = pkg_id.clone();
    }

    let result = orchestrator::run(mode, &opts, &effective_cfg)?;
    report_result(mode, &result);

    if mode == InstallMode::Install && result.is_success() {
        config::seed_global_config()?;
        paths::ensure_data_tree()?;

        // Remember an explicitly chosen helper for future runs.
        if cli.aur_helper.is_some() && cli.aur_helper != cfg.aur_helper {
            let mut updated = cfg.clone();
            updated.aur_helper = cli.aur_helper.clone();
            updated.save()?;
        }
    }

    Ok(result.exit_code())
}

/// Every abort carries a specific, actionable reason.
fn report_result(mode: InstallMode, result: &PackageManagerResult) {
    match result {
        PackageManagerResult::Success => match mode {
            InstallMode::Install => ui::success("vkBasalt is installed"),
            InstallMode::Uninstall => ui::success("vkBasalt is uninstalled"),
        },
        PackageManagerResult::NotFound => match mode {
            InstallMode::Install => ui::error(
                "vkbasalt is not available through this distribution's package manager, \
                 please install it manually",
            ),
            InstallMode::Uninstall => ui::error(
                "the package manager does not know about vkbasalt; if it was installed \
                 manually or through a foreign package, remove it the same way",
            ),
        },
        PackageManagerResult::PermissionDenied => {
            ui::error("permission denied by the package manager, check your sudo privileges");
        }
        PackageManagerResult::ToolchainMissing => {
            ui::error(
                "toolchain missing: building from the AUR needs a compiler, install base \
                 development tools (base-devel) and retry",
            );
        }
        PackageManagerResult::ManualInstallRequired => {
            ui::error("no automated route is available, please install or remove vkbasalt manually");
        }
        PackageManagerResult::UnknownDistro => {
            ui::error(
                "could not recognize this distribution, please install vkbasalt with your \
                 system's package manager or pass --force-distro",
            );
        }
        PackageManagerResult::Aborted(reason) => {
            ui::error(&format!("operation aborted: {reason}"));
        }
    }
}

fn run_config(command: ConfigCommands, cfg: &Config) -> Result<()> {
    match command {
        ConfigCommands::Path { per_app, workdir } => {
            let candidates = build_candidates(per_app, workdir)?;
            let effective = resolver::resolve(&candidates)?;
            ui::step(&format!(
                "effective config: {} ({})",
                effective.selected.path.display(),
                effective.selected.kind.describe()
            ));
            if effective.selected.exists {
                let content = fs::read_to_string(&effective.selected.path).with_context(|| {
                    format!("reading config {}", effective.selected.path.display())
                })?;
                let doc = SettingsDocument::parse(&content);
                if doc.is_empty() {
                    ui::step("the config file exists but defines no settings");
                } else {
                    ui::step(&format!("{} settings defined", doc.len()));
                }
            } else {
                ui::step("the file does not exist yet and will be created on the next save");
            }
            for warning in effective.warnings() {
                ui::warn(&warning);
            }
            Ok(())
        }
        ConfigCommands::Set {
            key,
            value,
            per_app,
            workdir,
        } => {
            let candidates = build_candidates(per_app, workdir)?;
            let effective = resolver::resolve(&candidates)?;

            let mut doc = if effective.selected.exists {
                let content = fs::read_to_string(&effective.selected.path).with_context(|| {
                    format!("reading config {}", effective.selected.path.display())
                })?;
                SettingsDocument::parse(&content)
            } else {
                SettingsDocument::new()
            };
            let previous = doc.get(&key).map(str::to_string);
            doc.set(&key, &value);

            let report = save::save(&doc, &candidates, &cfg.backup_root()?)?;
            if let Some(record) = &report.backup {
                ui::step(&format!(
                    "backed up previous config to {} ({})",
                    record.archive.display(),
                    record.created.format("%Y-%m-%d %H:%M:%S")
                ));
            }
            if let Some(previous) = previous {
                ui::step(&format!("{key} was {previous}"));
            }
            for warning in report.effective.warnings() {
                ui::warn(&warning);
            }
            ui::success(&format!(
                "{key} = {value} written to {}",
                report.effective.selected.path.display()
            ));
            Ok(())
        }
    }
}

fn build_candidates(
    per_app: Option<PathBuf>,
    workdir: bool,
) -> Result<Vec<ConfigCandidate>> {
    let global = paths::global_config_path()?;
    let workdir_path = if workdir {
        Some(paths::working_dir_config_path()?)
    } else {
        None
    };
    Ok(resolver::candidates(
        &global,
        per_app.as_deref(),
        workdir_path.as_deref(),
    ))
}
