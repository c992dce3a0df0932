//! Package installation subsystem: distro adapters, the Arch fallback
//! chain and the install/uninstall orchestrator.

pub mod adapter;
pub mod aur;
pub mod flatpak;
pub mod orchestrator;

/// Outcome of a package install or uninstall attempt.
///
/// These are expected results, not errors: the orchestrator interprets
/// them and none is ever silently coerced to success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageManagerResult {
    Success,
    /// The package is absent from the repositories the manager knows.
    NotFound,
    /// The manager refused for lack of privileges.
    PermissionDenied,
    /// No compiler available to build from the AUR.
    ToolchainMissing,
    /// No automated path exists; the user has to install by hand.
    ManualInstallRequired,
    /// /etc/os-release did not match any supported family.
    UnknownDistro,
    /// Anything else that stopped the operation, with the reason.
    Aborted(String),
}

impl PackageManagerResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Process exit code contract for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::ManualInstallRequired => 2,
            Self::PermissionDenied => 3,
            Self::ToolchainMissing => 4,
            Self::UnknownDistro => 5,
            Self::NotFound | Self::Aborted(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_contract() {
        let codes = [
            PackageManagerResult::Success.exit_code(),
            PackageManagerResult::ManualInstallRequired.exit_code(),
            PackageManagerResult::PermissionDenied.exit_code(),
            PackageManagerResult::ToolchainMissing.exit_code(),
            PackageManagerResult::UnknownDistro.exit_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
