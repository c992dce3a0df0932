//! Decides which of the candidate config locations is authoritative.

use std::path::{Path, PathBuf};

use crate::error::PyroclastError;

/// The three places a vkBasalt.conf can live, ordered by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// ~/.config/vkBasalt/vkBasalt.conf, always authoritative when present
    GlobalUserConfig,
    /// A per-game path, typically produced by the .desktop editor
    PerApplicationOverride,
    /// vkBasalt.conf in the game's working directory
    WorkingDirectoryDefault,
}

impl CandidateKind {
    /// Precedence rank, 0 highest. The ordering is total and fixed.
    pub fn rank(self) -> u8 {
        match self {
            Self::GlobalUserConfig => 0,
            Self::PerApplicationOverride => 1,
            Self::WorkingDirectoryDefault => 2,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::GlobalUserConfig => "global config",
            Self::PerApplicationOverride => "per-application override",
            Self::WorkingDirectoryDefault => "working directory config",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigCandidate {
    pub kind: CandidateKind,
    pub path: PathBuf,
    pub exists: bool,
}

impl ConfigCandidate {
    /// Build a candidate, probing the filesystem for existence.
    pub fn probe(kind: CandidateKind, path: PathBuf) -> Self {
        let exists = path.exists();
        ConfigCandidate { kind, path, exists }
    }
}

/// The resolved write target plus every existing candidate it shadows.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub selected: ConfigCandidate,
    pub shadowed: Vec<ConfigCandidate>,
}

impl EffectiveConfig {
    /// One warning line per shadowed candidate, for the caller to show.
    /// Shadowing is valid usage, so these never block anything.
    pub fn warnings(&self) -> Vec<String> {
        self.shadowed
            .iter()
            .map(|candidate| {
                format!(
                    "{} at {} is shadowed by the {} at {} and will be ignored by vkBasalt",
                    candidate.kind.describe(),
                    candidate.path.display(),
                    self.selected.kind.describe(),
                    self.selected.path.display(),
                )
            })
            .collect()
    }
}

/// Select the authoritative config location.
///
/// The highest-precedence *existing* candidate wins. A candidate whose
/// file does not exist yet is still a valid write target, but only when
/// no candidate exists at all; it never shadows an existing file. An
/// empty candidate list is an explicit error, no path is ever invented.
pub fn resolve(candidates: &[ConfigCandidate]) -> Result<EffectiveConfig, PyroclastError> {
    if candidates.is_empty() {
        return Err(PyroclastError::NoCandidates);
    }

    let mut ordered: Vec<ConfigCandidate> = candidates.to_vec();
    ordered.sort_by_key(|c| c.kind.rank());

    let selected = ordered
        .iter()
        .find(|c| c.exists)
        .unwrap_or(&ordered[0])
        .clone();

    let shadowed: Vec<ConfigCandidate> = ordered
        .into_iter()
        .filter(|c| c.exists && c.kind.rank() > selected.kind.rank())
        .collect();

    Ok(EffectiveConfig { selected, shadowed })
}

/// Convenience for the common call sites: build the candidate set from
/// the enabled locations, probing the filesystem.
pub fn candidates(
    global: &Path,
    per_app: Option<&Path>,
    working_dir: Option<&Path>,
) -> Vec<ConfigCandidate> {
    let mut list = vec![ConfigCandidate::probe(
        CandidateKind::GlobalUserConfig,
        global.to_path_buf(),
    )];
    if let Some(path) = per_app {
        list.push(ConfigCandidate::probe(
            CandidateKind::PerApplicationOverride,
            path.to_path_buf(),
        ));
    }
    if let Some(path) = working_dir {
        list.push(ConfigCandidate::probe(
            CandidateKind::WorkingDirectoryDefault,
            path.to_path_buf(),
        ));
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(kind: CandidateKind, exists: bool) -> ConfigCandidate {
        let path = match kind {
            CandidateKind::GlobalUserConfig => "/home/user/.config/vkBasalt/vkBasalt.conf",
            CandidateKind::PerApplicationOverride => "/home/user/games/quake/vkBasalt.conf",
            CandidateKind::WorkingDirectoryDefault => "/home/user/cwd/vkBasalt.conf",
        };
        ConfigCandidate {
            kind,
            path: PathBuf::from(path),
            exists,
        }
    }

    #[test]
    fn test_empty_candidate_list_fails_explicitly() {
        assert!(matches!(
            resolve(&[]),
            Err(PyroclastError::NoCandidates)
        ));
    }

    #[test]
    fn test_highest_precedence_existing_candidate_wins() {
        // Exhaustive over every existence combination of all three kinds.
        let kinds = [
            CandidateKind::GlobalUserConfig,
            CandidateKind::PerApplicationOverride,
            CandidateKind::WorkingDirectoryDefault,
        ];
        for mask in 0u8..8 {
            let candidates: Vec<ConfigCandidate> = kinds
                .iter()
                .enumerate()
                .map(|(i, &kind)| candidate(kind, mask & (1 << i) != 0))
                .collect();
            let effective = resolve(&candidates).unwrap();

            let expected_kind = kinds
                .iter()
                .enumerate()
                .find(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, &kind)| kind)
                // Nothing exists: the highest rank is the write target.
                .unwrap_or(CandidateKind::GlobalUserConfig);
            assert_eq!(effective.selected.kind, expected_kind, "mask {mask:#05b}");
        }
    }

    #[test]
    fn test_global_shadows_working_dir() {
        // Existing global config plus an existing working-dir config:
        // global is selected, the other lands on the shadow list.
        let candidates = vec![
            candidate(CandidateKind::GlobalUserConfig, true),
            candidate(CandidateKind::WorkingDirectoryDefault, true),
        ];
        let effective = resolve(&candidates).unwrap();
        assert_eq!(effective.selected.kind, CandidateKind::GlobalUserConfig);
        assert_eq!(effective.shadowed.len(), 1);
        assert_eq!(
            effective.shadowed[0].kind,
            CandidateKind::WorkingDirectoryDefault
        );
        assert_eq!(effective.warnings().len(), 1);
    }

    #[test]
    fn test_missing_global_does_not_shadow_existing_override() {
        let candidates = vec![
            candidate(CandidateKind::GlobalUserConfig, false),
            candidate(CandidateKind::PerApplicationOverride, true),
        ];
        let effective = resolve(&candidates).unwrap();
        assert_eq!(
            effective.selected.kind,
            CandidateKind::PerApplicationOverride
        );
        assert!(effective.shadowed.is_empty());
    }

    #[test]
    fn test_no_existing_candidate_selects_highest_rank_write_target() {
        let candidates = vec![
            candidate(CandidateKind::PerApplicationOverride, false),
            candidate(CandidateKind::WorkingDirectoryDefault, false),
        ];
        let effective = resolve(&candidates).unwrap();
        assert_eq!(
            effective.selected.kind,
            CandidateKind::PerApplicationOverride
        );
        assert!(!effective.selected.exists);
        assert!(effective.shadowed.is_empty());
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let forward = vec![
            candidate(CandidateKind::GlobalUserConfig, true),
            candidate(CandidateKind::PerApplicationOverride, true),
            candidate(CandidateKind::WorkingDirectoryDefault, true),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = resolve(&forward).unwrap();
        let b = resolve(&reversed).unwrap();
        assert_eq!(a.selected, b.selected);
        assert_eq!(a.shadowed, b.shadowed);
        assert_eq!(a.shadowed.len(), 2);
    }
}
