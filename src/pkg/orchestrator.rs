//! Sequences detection, adapter selection and the install/uninstall
//! decision. Runs once at setup time; the per-save config pipeline is
//! independent of it.

use std::path::{Path, PathBuf};

use crate::common::config::Config;
use crate::common::distro::DistroFamily;
use crate::error::PyroclastError;
use crate::ui;

use super::PackageManagerResult;
use super::adapter::{NativeAdapter, PACKAGE};
use super::aur::{self, SystemArchOps};
use super::flatpak;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    Install,
    Uninstall,
}

/// Caller-supplied knobs for a single orchestrator run.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Extra location to check for an existing installation. Redirects
    /// the presence probe only, never the package manager selection.
    pub custom_path: Option<PathBuf>,
    pub aur_helper: Option<String>,
    pub flatpak: bool,
    pub force_distro: Option<DistroFamily>,
}

/// Known file locations of an installed vkBasalt layer.
const KNOWN_LOCATIONS: &[&str] = &[
    "/usr/lib/libvkbasalt.so",
    "/usr/share/vulkan/implicit_layer.d/vkBasalt.json",
    "/usr/share/vkBasalt/vkBasalt.conf.example",
];

/// Probe PATH and known filesystem locations for the layer.
pub fn layer_present(custom_path: Option<&Path>) -> bool {
    for binary in ["vkbasalt", "vkBasalt"] {
        if which::which(binary).is_ok() {
            return true;
        }
    }
    if KNOWN_LOCATIONS.iter().any(|p| Path::new(p).exists()) {
        return true;
    }
    custom_path.is_some_and(|p| p.exists())
}

/// The capability surface `run_with` sequences. One production
/// implementation per route; fakes in the tests.
pub(crate) trait PackageOps {
    fn present(&self) -> bool;
    fn install(&mut self) -> Result<PackageManagerResult, PyroclastError>;
    fn uninstall(&mut self) -> Result<PackageManagerResult, PyroclastError>;
}

/// The mode-level decision: install is idempotent, uninstall always
/// goes through the adapter so out-of-band installs surface as
/// `NotFound` rather than being guessed at.
pub(crate) fn run_with(
    mode: InstallMode,
    ops: &mut dyn PackageOps,
) -> Result<PackageManagerResult, PyroclastError> {
    match mode {
        InstallMode::Install => {
            if ops.present() {
                ui::step("vkBasalt is already installed, skipping installation");
                return Ok(PackageManagerResult::Success);
            }
            ops.install()
        }
        InstallMode::Uninstall => ops.uninstall(),
    }
}

struct SystemOps {
    family: DistroFamily,
    adapter: NativeAdapter,
    custom_path: Option<PathBuf>,
    aur_helper: Option<String>,
}

impl PackageOps for SystemOps {
    fn present(&self) -> bool {
        let found = layer_present(self.custom_path.as_deref())
            || self.adapter.is_installed(PACKAGE);
        if !found {
            return false;
        }
        // An AUR install can be present but stale. Treat outdated as
        // absent so the install path refreshes it through the helper.
        if self.family == DistroFamily::Arch
            && let Some(helper) = &self.aur_helper
            && which::which(helper).is_ok()
        {
            return aur::helper_reports_up_to_date(helper, PACKAGE);
        }
        true
    }

    fn install(&mut self) -> Result<PackageManagerResult, PyroclastError> {
        match self.family {
            DistroFamily::Arch => {
                aur::install(&mut SystemArchOps, self.aur_helper.as_deref())
            }
            _ => Ok(self.adapter.install(PACKAGE)),
        }
    }

    fn uninstall(&mut self) -> Result<PackageManagerResult, PyroclastError> {
        match self.family {
            DistroFamily::Arch => {
                aur::uninstall(&mut SystemArchOps, self.aur_helper.as_deref())
            }
            _ => Ok(self.adapter.uninstall(PACKAGE)),
        }
    }
}

/// Entry point for the installer flow.
pub fn run(
    mode: InstallMode,
    opts: &Options,
    cfg: &Config,
) -> Result<PackageManagerResult, PyroclastError> {
    if opts.flatpak {
        return match mode {
            InstallMode::Install => flatpak::install(&cfg.flatpak_pkg),
            InstallMode::Uninstall => flatpak::uninstall(&cfg.flatpak_pkg),
        };
    }

    let family = opts.force_distro.unwrap_or_else(DistroFamily::detect);
    ui::step(&format!("detected distribution family: {family}"));

    let Some(adapter) = NativeAdapter::for_family(family) else {
        return Ok(PackageManagerResult::UnknownDistro);
    };

    if mode == InstallMode::Install && std::env::consts::ARCH != "x86_64" {
        return Ok(PackageManagerResult::Aborted(format!(
            "only x86_64 systems are supported, this machine is {}",
            std::env::consts::ARCH
        )));
    }

    let aur_helper = opts.aur_helper.clone().or_else(|| cfg.aur_helper.clone());
    let mut ops = SystemOps {
        family,
        adapter,
        custom_path: opts.custom_path.clone(),
        aur_helper,
    };
    run_with(mode, &mut ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeOps {
        present: bool,
        install_result: PackageManagerResult,
        uninstall_result: PackageManagerResult,
        installs: Cell<u32>,
        uninstalls: Cell<u32>,
    }

    impl FakeOps {
        fn new(present: bool) -> Self {
            FakeOps {
                present,
                install_result: PackageManagerResult::Success,
                uninstall_result: PackageManagerResult::Success,
                installs: Cell::new(0),
                uninstalls: Cell::new(0),
            }
        }
    }

    impl PackageOps for FakeOps {
        fn present(&self) -> bool {
            self.present
        }

        fn install(&mut self) -> Result<PackageManagerResult, PyroclastError> {
            self.installs.set(self.installs.get() + 1);
            Ok(self.install_result.clone())
        }

        fn uninstall(&mut self) -> Result<PackageManagerResult, PyroclastError> {
            self.uninstalls.set(self.uninstalls.get() + 1);
            Ok(self.uninstall_result.clone())
        }
    }

    #[test]
    fn test_install_is_idempotent_when_already_present() {
        let mut ops = FakeOps::new(true);
        // Twice in a row: Success both times, manager never invoked.
        for _ in 0..2 {
            let result = run_with(InstallMode::Install, &mut ops).unwrap();
            assert_eq!(result, PackageManagerResult::Success);
        }
        assert_eq!(ops.installs.get(), 0);
    }

    #[test]
    fn test_install_invokes_backend_when_absent() {
        let mut ops = FakeOps::new(false);
        let result = run_with(InstallMode::Install, &mut ops).unwrap();
        assert_eq!(result, PackageManagerResult::Success);
        assert_eq!(ops.installs.get(), 1);
    }

    #[test]
    fn test_uninstall_surfaces_not_found() {
        // Installed outside recognized channels: the adapter reports
        // NotFound and we pass that through instead of hiding it.
        let mut ops = FakeOps::new(true);
        ops.uninstall_result = PackageManagerResult::NotFound;
        let result = run_with(InstallMode::Uninstall, &mut ops).unwrap();
        assert_eq!(result, PackageManagerResult::NotFound);
        assert_eq!(ops.uninstalls.get(), 1);
    }

    #[test]
    fn test_uninstall_runs_even_when_probe_sees_nothing() {
        let mut ops = FakeOps::new(false);
        let result = run_with(InstallMode::Uninstall, &mut ops).unwrap();
        assert_eq!(result, PackageManagerResult::Success);
        assert_eq!(ops.uninstalls.get(), 1);
    }

    #[test]
    fn test_unknown_distro_short_circuits() {
        let opts = Options {
            force_distro: Some(DistroFamily::Unknown),
            ..Options::default()
        };
        let cfg = Config::default();
        let result = run(InstallMode::Install, &opts, &cfg).unwrap();
        assert_eq!(result, PackageManagerResult::UnknownDistro);
    }
}
