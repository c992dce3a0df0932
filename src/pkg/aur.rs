//! Arch fallback chain: native pacman first, then a configured AUR
//! helper, aborting when the build toolchain is absent.
//!
//! The chain is an explicit state machine with one transition per
//! outcome. Every step runs at most once per invocation; in particular
//! the helper is structurally unreachable once `ToolchainMissing` has
//! been decided.

use duct::cmd;

use crate::error::PyroclastError;
use crate::ui;

use super::PackageManagerResult;
use super::adapter::{self, NativeAdapter, PACKAGE};

/// Helpers we know how to drive. A name outside this set is a
/// configuration error, not a silent no-op.
pub const KNOWN_HELPERS: &[&str] = &["yay", "paru", "pikaur", "trizen"];

/// Probes and actions the fallback policy drives. Separated out so the
/// transition logic can be exercised without touching pacman.
pub trait ArchOps {
    fn native_install(&mut self) -> PackageManagerResult;
    fn native_uninstall(&mut self) -> PackageManagerResult;
    fn toolchain_present(&self) -> bool;
    fn helper_available(&self, helper: &str) -> bool;
    fn helper_install(&mut self, helper: &str) -> PackageManagerResult;
    fn helper_uninstall(&mut self, helper: &str) -> PackageManagerResult;
    /// Ask the user to pick a helper. Returns None when no choice can
    /// be made (non-interactive session, prompt dismissed).
    fn choose_helper(&self) -> Option<String>;
}

enum State {
    TryNative,
    CheckToolchain,
    TryHelper(String),
    Done(PackageManagerResult),
}

/// Run the install fallback chain.
pub fn install(
    ops: &mut dyn ArchOps,
    configured_helper: Option<&str>,
) -> Result<PackageManagerResult, PyroclastError> {
    let mut state = State::TryNative;
    loop {
        state = match state {
            State::TryNative => match ops.native_install() {
                // Absent from the official repos: the AUR is next.
                PackageManagerResult::NotFound => State::CheckToolchain,
                other => State::Done(other),
            },
            State::CheckToolchain => {
                if !ops.toolchain_present() {
                    // Hard abort. Building AUR packages needs a compiler,
                    // so the helper must not run.
                    State::Done(PackageManagerResult::ToolchainMissing)
                } else {
                    State::TryHelper(resolve_helper(ops, configured_helper)?)
                }
            }
            State::TryHelper(helper) => {
                ui::step(&format!("installing {PACKAGE} from the AUR via {helper}..."));
                State::Done(ops.helper_install(&helper))
            }
            State::Done(result) => return Ok(result),
        };
    }
}

/// Remove the package, falling back to the helper when pacman does not
/// know it (AUR installs are still tracked by pacman, but a helper can
/// resolve debris pacman refuses to touch).
pub fn uninstall(
    ops: &mut dyn ArchOps,
    configured_helper: Option<&str>,
) -> Result<PackageManagerResult, PyroclastError> {
    match ops.native_uninstall() {
        PackageManagerResult::NotFound => match resolve_helper(ops, configured_helper) {
            Ok(helper) => Ok(ops.helper_uninstall(&helper)),
            Err(PyroclastError::AurHelperUnspecified) => {
                Ok(PackageManagerResult::ManualInstallRequired)
            }
            Err(err) => Err(err),
        },
        other => Ok(other),
    }
}

/// Validate the configured helper, or ask for one.
fn resolve_helper(
    ops: &dyn ArchOps,
    configured: Option<&str>,
) -> Result<String, PyroclastError> {
    let name = match configured {
        Some(name) => name.to_string(),
        None => ops
            .choose_helper()
            .ok_or(PyroclastError::AurHelperUnspecified)?,
    };
    if !KNOWN_HELPERS.contains(&name.as_str()) {
        return Err(PyroclastError::UnrecognizedAurHelper(name));
    }
    if !ops.helper_available(&name) {
        return Err(PyroclastError::AurHelperMissing(name));
    }
    Ok(name)
}

/// Production implementation backed by pacman, which(1) lookups and the
/// actual helper binaries.
pub struct SystemArchOps;

impl ArchOps for SystemArchOps {
    fn native_install(&mut self) -> PackageManagerResult {
        NativeAdapter::Pacman.install(PACKAGE)
    }

    fn native_uninstall(&mut self) -> PackageManagerResult {
        NativeAdapter::Pacman.uninstall(PACKAGE)
    }

    fn toolchain_present(&self) -> bool {
        which::which("gcc").is_ok() || which::which("cc").is_ok()
    }

    fn helper_available(&self, helper: &str) -> bool {
        which::which(helper).is_ok()
    }

    fn helper_install(&mut self, helper: &str) -> PackageManagerResult {
        let argv: Vec<String> = [helper, "-S", "--needed", "--noconfirm", PACKAGE]
            .iter()
            .map(|s| s.to_string())
            .collect();
        adapter::run_classified(&argv)
    }

    fn helper_uninstall(&mut self, helper: &str) -> PackageManagerResult {
        let argv: Vec<String> = [helper, "-Rns", "--noconfirm", PACKAGE]
            .iter()
            .map(|s| s.to_string())
            .collect();
        adapter::run_classified(&argv)
    }

    fn choose_helper(&self) -> Option<String> {
        let installed: Vec<&str> = KNOWN_HELPERS
            .iter()
            .copied()
            .filter(|helper| self.helper_available(helper))
            .collect();
        if installed.is_empty() {
            return None;
        }

        let selection = dialoguer::Select::new()
            .with_prompt("vkbasalt is not in the official repos. Which AUR helper should build it?")
            .items(&installed)
            .default(0)
            .interact()
            .ok()?;
        installed.get(selection).map(|s| s.to_string())
    }
}

/// Check whether the AUR-installed package matches the latest version
/// the helper can see. Used to keep repeat installs idempotent.
pub fn helper_reports_up_to_date(helper: &str, pkg: &str) -> bool {
    let installed = cmd(helper, ["-Q", pkg])
        .stderr_capture()
        .read()
        .ok()
        .and_then(|out| parse_query_version(&out));
    let latest = cmd(helper, ["-Si", pkg])
        .stderr_capture()
        .read()
        .ok()
        .and_then(|out| parse_info_version(&out));

    match (installed, latest) {
        (Some(installed), Some(latest)) => installed == latest,
        _ => false,
    }
}

/// Second whitespace field of `<helper> -Q <pkg>`: "vkbasalt 0.3.2.10-1".
fn parse_query_version(output: &str) -> Option<String> {
    output.split_whitespace().nth(1).map(|v| v.to_string())
}

/// The `Version` field of `<helper> -Si <pkg>` output.
fn parse_info_version(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case("version") {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}
