//! Stable processing-result codes.

use serde::{Deserialize, Serialize};

/// Outcome of a profile-processing run.
///
/// The numeric codes double as process exit codes and are consumed by the
/// installer-side orchestration; they are contractually stable and must not
/// be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum ProcessingResult {
    /// Generic success for runs that perform no significance analysis.
    Success = 0,
    /// The merged profiles differ significantly from the reference; the
    /// reference has been replaced with the merged result. Compile.
    Compile = 1,
    /// The difference is insignificant; no file was modified.
    SkipCompilation = 2,
    /// One or more input profiles were structurally invalid.
    ErrorBadProfiles = 3,
    /// Reading or writing a profile failed.
    ErrorIo = 4,
    /// An exclusive lock on a profile file could not be acquired.
    ErrorCannotLock = 5,
    /// Input and reference profiles carry incompatible format versions.
    ErrorDifferentVersions = 6,
}

impl ProcessingResult {
    /// The stable process exit code for this result.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        self as i32
    }

    /// Returns `true` for the two non-error verdicts.
    #[must_use]
    pub const fn is_verdict(self) -> bool {
        matches!(self, Self::Compile | Self::SkipCompilation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_contractually_stable() {
        assert_eq!(ProcessingResult::Success.exit_code(), 0);
        assert_eq!(ProcessingResult::Compile.exit_code(), 1);
        assert_eq!(ProcessingResult::SkipCompilation.exit_code(), 2);
        assert_eq!(ProcessingResult::ErrorBadProfiles.exit_code(), 3);
        assert_eq!(ProcessingResult::ErrorIo.exit_code(), 4);
        assert_eq!(ProcessingResult::ErrorCannotLock.exit_code(), 5);
        assert_eq!(ProcessingResult::ErrorDifferentVersions.exit_code(), 6);
    }

    #[test]
    fn test_verdict_classification() {
        assert!(ProcessingResult::Compile.is_verdict());
        assert!(ProcessingResult::SkipCompilation.is_verdict());
        assert!(!ProcessingResult::Success.is_verdict());
        assert!(!ProcessingResult::ErrorCannotLock.is_verdict());
    }
}
