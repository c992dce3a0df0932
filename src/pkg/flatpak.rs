//! Flatpak route, bypassing the distro adapters entirely.

use crate::error::PyroclastError;
use crate::ui;

use super::PackageManagerResult;
use super::adapter::run_classified;

fn require_flatpak() -> Result<(), PyroclastError> {
    if which::which("flatpak").is_err() {
        return Err(PyroclastError::PackageManagerNotFound(
            "flatpak".to_string(),
        ));
    }
    Ok(())
}

pub fn install(pkg_id: &str) -> Result<PackageManagerResult, PyroclastError> {
    require_flatpak()?;
    ui::step(&format!("installing {pkg_id} via flatpak..."));
    let argv: Vec<String> = [
        "flatpak",
        "install",
        "--user",
        "--noninteractive",
        "flathub",
        pkg_id,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    Ok(run_classified(&argv))
}

pub fn uninstall(pkg_id: &str) -> Result<PackageManagerResult, PyroclastError> {
    require_flatpak()?;
    ui::step(&format!("uninstalling {pkg_id} via flatpak..."));
    let argv: Vec<String> = ["flatpak", "uninstall", "--user", "-y", pkg_id]
        .iter()
        .map(|s| s.to_string())
        .collect();
    Ok(run_classified(&argv))
}
