use thiserror::Error;

/// Failures that abort the current operation. Expected negative outcomes
/// (missing package, absent manager) travel as `PackageManagerResult`
/// values instead and never show up here.
#[derive(Debug, Error)]
pub enum PyroclastError {
    #[error("'{0}' is not a recognized distribution")]
    UnknownPlatform(String),

    #[error("required package manager '{0}' was not found on this system")]
    PackageManagerNotFound(String),

    #[error("no AUR helper configured, pass --aur-helper or set one in pyroclast.toml")]
    AurHelperUnspecified,

    #[error("'{0}' is not a recognized AUR helper (known helpers: yay, paru, pikaur, trizen)")]
    UnrecognizedAurHelper(String),

    #[error("AUR helper '{0}' is not installed or not on PATH")]
    AurHelperMissing(String),

    #[error("backup failed: {0}")]
    Backup(#[source] std::io::Error),

    #[error("config write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("no config file candidates were supplied")]
    NoCandidates,
}
