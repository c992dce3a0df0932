use std::fs;
use std::path::Path;

/// Linux distribution families, grouped by native package manager.
///
/// Derived once from /etc/os-release and treated as immutable for the
/// process lifetime. Detection never fails: anything unreadable or
/// unrecognized becomes `Unknown` and callers must handle that case
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistroFamily {
    /// Debian, Ubuntu, Linux Mint and derivatives (apt)
    Debian,
    /// Fedora, CentOS, RHEL (dnf)
    Fedora,
    /// Arch, Manjaro, CachyOS, EndeavourOS (pacman, AUR)
    Arch,
    /// Void Linux (xbps)
    Void,
    /// Solus (eopkg)
    Solus,
    /// openSUSE Leap and Tumbleweed (zypper)
    OpenSUSE,
    /// Anything we cannot classify
    Unknown,
}

impl DistroFamily {
    /// Detect the current distribution family from /etc/os-release.
    pub fn detect() -> Self {
        match fs::read_to_string(Path::new("/etc/os-release")) {
            Ok(content) => Self::parse_os_release(&content),
            Err(_) => Self::Unknown,
        }
    }

    /// Parse os-release content and return the detected family.
    ///
    /// `ID=` is matched first against known identifiers; when that does
    /// not classify the host, `ID_LIKE=` decides the family.
    fn parse_os_release(content: &str) -> Self {
        let mut id = String::new();
        let mut id_like = String::new();

        for line in content.lines() {
            if let Some(val) = line.strip_prefix("ID=") {
                id = val.trim_matches('"').to_ascii_lowercase();
            } else if let Some(val) = line.strip_prefix("ID_LIKE=") {
                id_like = val.trim_matches('"').to_ascii_lowercase();
            }
        }

        match id.as_str() {
            "debian" | "ubuntu" | "linuxmint" => Self::Debian,
            "fedora" | "centos" | "rhel" => Self::Fedora,
            "arch" | "manjaro" | "cachyos" | "endeavouros" => Self::Arch,
            "void" => Self::Void,
            "solus" => Self::Solus,
            "opensuse" | "opensuse-leap" | "opensuse-tumbleweed" => Self::OpenSUSE,
            _ => {
                if id_like.contains("debian") || id_like.contains("ubuntu") {
                    Self::Debian
                } else if id_like.contains("fedora") || id_like.contains("rhel") {
                    Self::Fedora
                } else if id_like.contains("arch") {
                    Self::Arch
                } else if id_like.contains("void") {
                    Self::Void
                } else if id_like.contains("solus") {
                    Self::Solus
                } else if id_like.contains("suse") {
                    Self::OpenSUSE
                } else {
                    Self::Unknown
                }
            }
        }
    }

    /// Parse a user-supplied family name (used by `--force-distro`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "debian" => Some(Self::Debian),
            "fedora" => Some(Self::Fedora),
            "arch" => Some(Self::Arch),
            "void" => Some(Self::Void),
            "solus" => Some(Self::Solus),
            "opensuse" => Some(Self::OpenSUSE),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Debian => "Debian",
            Self::Fedora => "Fedora",
            Self::Arch => "Arch",
            Self::Void => "Void",
            Self::Solus => "Solus",
            Self::OpenSUSE => "openSUSE",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for DistroFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
