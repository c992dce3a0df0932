//! Native package manager backends, one per distribution family.
//!
//! Each adapter wraps its family's tool behind the same capability set
//! (query, install, uninstall) and maps exit status and stderr patterns
//! to a typed `PackageManagerResult`. Keeping this a closed enum means
//! adding a distribution is a localized, exhaustiveness-checked change.

use duct::cmd;

use crate::common::distro::DistroFamily;
use crate::ui;

use super::PackageManagerResult;

/// Package name of the vkBasalt layer in every supported repository.
pub const PACKAGE: &str = "vkbasalt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeAdapter {
    /// Debian family: apt-get / dpkg
    Apt,
    /// Fedora family: dnf / rpm
    Dnf,
    /// Arch family: pacman
    Pacman,
    /// Void: xbps-install / xbps-query
    Xbps,
    /// Solus: eopkg
    Eopkg,
    /// openSUSE: zypper / rpm
    Zypper,
}

impl NativeAdapter {
    /// The adapter for a distribution family. `Unknown` has no adapter;
    /// the orchestrator must short-circuit to a manual-install result
    /// instead of guessing.
    pub fn for_family(family: DistroFamily) -> Option<Self> {
        match family {
            DistroFamily::Debian => Some(Self::Apt),
            DistroFamily::Fedora => Some(Self::Dnf),
            DistroFamily::Arch => Some(Self::Pacman),
            DistroFamily::Void => Some(Self::Xbps),
            DistroFamily::Solus => Some(Self::Eopkg),
            DistroFamily::OpenSUSE => Some(Self::Zypper),
            DistroFamily::Unknown => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Pacman => "pacman",
            Self::Xbps => "xbps",
            Self::Eopkg => "eopkg",
            Self::Zypper => "zypper",
        }
    }

    /// Query the package database for an installed package.
    pub fn is_installed(&self, pkg: &str) -> bool {
        let argv: &[&str] = match self {
            Self::Apt => &["dpkg", "-s"],
            Self::Dnf | Self::Zypper => &["rpm", "-q"],
            Self::Pacman => &["pacman", "-Q"],
            Self::Xbps => &["xbps-query"],
            Self::Eopkg => &["eopkg", "info"],
        };
        let mut args: Vec<&str> = argv[1..].to_vec();
        args.push(pkg);

        let output = cmd(argv[0], &args)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run();

        match output {
            Ok(out) if !out.status.success() => false,
            // eopkg info exits 0 even for uninstalled packages
            Ok(out) if *self == Self::Eopkg => {
                String::from_utf8_lossy(&out.stdout).contains("Installed package:")
            }
            Ok(_) => true,
            Err(_) => false,
        }
    }

    /// Install a package through this family's tool.
    pub fn install(&self, pkg: &str) -> PackageManagerResult {
        ui::step(&format!("installing {pkg} via {}...", self.display_name()));
        for argv in self.install_steps(pkg) {
            let result = run_classified(&argv);
            if !result.is_success() {
                return result;
            }
        }
        PackageManagerResult::Success
    }

    /// Remove a package through this family's tool.
    pub fn uninstall(&self, pkg: &str) -> PackageManagerResult {
        ui::step(&format!("uninstalling {pkg} via {}...", self.display_name()));
        run_classified(&self.uninstall_step(pkg))
    }

    /// Commands run in order for an install. Families with a separate
    /// index refresh (apt, eopkg) get two steps.
    fn install_steps(&self, pkg: &str) -> Vec<Vec<String>> {
        let steps: Vec<Vec<&str>> = match self {
            Self::Apt => vec![
                vec!["sudo", "apt-get", "update"],
                vec!["sudo", "apt-get", "install", "-y", pkg],
            ],
            Self::Dnf => vec![vec!["sudo", "dnf", "install", "-y", pkg]],
            Self::Pacman => vec![vec!["sudo", "pacman", "-S", "--needed", "--noconfirm", pkg]],
            Self::Xbps => vec![vec!["sudo", "xbps-install", "-Sy", pkg]],
            Self::Eopkg => vec![
                vec!["sudo", "eopkg", "update-repo"],
                vec!["sudo", "eopkg", "install", "-y", pkg],
            ],
            Self::Zypper => vec![vec!["sudo", "zypper", "install", "-y", pkg]],
        };
        steps
            .into_iter()
            .map(|argv| argv.into_iter().map(String::from).collect())
            .collect()
    }

    fn uninstall_step(&self, pkg: &str) -> Vec<String> {
        let argv: Vec<&str> = match self {
            Self::Apt => vec!["sudo", "apt-get", "remove", "-y", pkg],
            Self::Dnf => vec!["sudo", "dnf", "remove", "-y", pkg],
            Self::Pacman => vec!["sudo", "pacman", "-Rns", "--noconfirm", pkg],
            Self::Xbps => vec!["sudo", "xbps-remove", "-Ry", pkg],
            Self::Eopkg => vec!["sudo", "eopkg", "remove", "-y", pkg],
            Self::Zypper => vec!["sudo", "zypper", "remove", "-y", pkg],
        };
        argv.into_iter().map(String::from).collect()
    }
}

/// Run a command and map its outcome to a `PackageManagerResult`.
pub(crate) fn run_classified(argv: &[String]) -> PackageManagerResult {
    let Some((program, args)) = argv.split_first() else {
        return PackageManagerResult::Aborted("empty command".to_string());
    };

    let output = match cmd(program.as_str(), args)
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .run()
    {
        Ok(output) => output,
        Err(err) => {
            return PackageManagerResult::Aborted(format!("failed to run {program}: {err}"));
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    classify_output(output.status.success(), &stdout, &stderr)
}

/// Map a finished command to a typed result.
///
/// `PermissionDenied` must stay distinguishable from `NotFound` so the
/// orchestrator can suggest privilege elevation instead of reporting a
/// missing package. Permission patterns are checked first.
pub(crate) fn classify_output(
    success: bool,
    stdout: &str,
    stderr: &str,
) -> PackageManagerResult {
    if success {
        return PackageManagerResult::Success;
    }

    let combined = format!("{stdout}\n{stderr}").to_ascii_lowercase();

    const PERMISSION_PATTERNS: &[&str] = &[
        "permission denied",
        "operation not permitted",
        "unless you are root",
        "must be run as root",
        "a password is required",
        "incorrect password",
        "a terminal is required",
    ];
    if PERMISSION_PATTERNS.iter().any(|p| combined.contains(p)) {
        return PackageManagerResult::PermissionDenied;
    }

    const NOT_FOUND_PATTERNS: &[&str] = &[
        "unable to locate package",
        "no match for argument",
        "target not found",
        "package not found",
        "not found in repository",
        "no provider of",
        "nothing provides",
        "couldn't find any package",
    ];
    if NOT_FOUND_PATTERNS.iter().any(|p| combined.contains(p)) {
        return PackageManagerResult::NotFound;
    }

    let reason = stderr
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("command failed")
        .trim()
        .to_string();
    PackageManagerResult::Aborted(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_per_family() {
        assert_eq!(
            NativeAdapter::for_family(DistroFamily::Debian),
            Some(NativeAdapter::Apt)
        );
        assert_eq!(
            NativeAdapter::for_family(DistroFamily::Fedora),
            Some(NativeAdapter::Dnf)
        );
        assert_eq!(
            NativeAdapter::for_family(DistroFamily::Arch),
            Some(NativeAdapter::Pacman)
        );
        assert_eq!(
            NativeAdapter::for_family(DistroFamily::Void),
            Some(NativeAdapter::Xbps)
        );
        assert_eq!(
            NativeAdapter::for_family(DistroFamily::Solus),
            Some(NativeAdapter::Eopkg)
        );
        assert_eq!(
            NativeAdapter::for_family(DistroFamily::OpenSUSE),
            Some(NativeAdapter::Zypper)
        );
        assert_eq!(NativeAdapter::for_family(DistroFamily::Unknown), None);
    }

    #[test]
    fn test_classify_success() {
        assert_eq!(
            classify_output(true, "", ""),
            PackageManagerResult::Success
        );
    }

    #[test]
    fn test_classify_not_found_patterns() {
        // apt
        assert_eq!(
            classify_output(false, "", "E: Unable to locate package vkbasalt"),
            PackageManagerResult::NotFound
        );
        // pacman
        assert_eq!(
            classify_output(false, "", "error: target not found: vkbasalt"),
            PackageManagerResult::NotFound
        );
        // dnf
        assert_eq!(
            classify_output(false, "", "No match for argument: vkbasalt"),
            PackageManagerResult::NotFound
        );
        // zypper
        assert_eq!(
            classify_output(false, "No provider of 'vkbasalt' found.", ""),
            PackageManagerResult::NotFound
        );
        // xbps
        assert_eq!(
            classify_output(false, "", "Package 'vkbasalt' not found in repository pool."),
            PackageManagerResult::NotFound
        );
    }

    #[test]
    fn test_classify_permission_denied_patterns() {
        assert_eq!(
            classify_output(false, "", "sudo: a password is required"),
            PackageManagerResult::PermissionDenied
        );
        assert_eq!(
            classify_output(
                false,
                "",
                "error: you cannot perform this operation unless you are root."
            ),
            PackageManagerResult::PermissionDenied
        );
        assert_eq!(
            classify_output(false, "", "eopkg: Operation not permitted"),
            PackageManagerResult::PermissionDenied
        );
    }

    #[test]
    fn test_permission_wins_over_not_found() {
        // Both patterns present: suggest elevation, not a missing package.
        let stderr = "Permission denied\nE: Unable to locate package vkbasalt";
        assert_eq!(
            classify_output(false, "", stderr),
            PackageManagerResult::PermissionDenied
        );
    }

    #[test]
    fn test_classify_other_failure_carries_reason() {
        match classify_output(false, "", "error: failed to commit transaction\n") {
            PackageManagerResult::Aborted(reason) => {
                assert_eq!(reason, "error: failed to commit transaction");
            }
            other => panic!("expected Aborted, got {other:?}"),
        }
    }
}
