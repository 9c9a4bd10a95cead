//! The significance-analysis seam.
//!
//! Parsing the profile binary format and computing the diff/merge is not this
//! system's job. The assistant hands the analyzer opaque byte blobs and gets
//! back a merged blob plus a significance verdict against the configured
//! thresholds.

use thiserror::Error;

use crate::options::ProfileOptions;

/// Structural failure reported by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzerError {
    /// An input or the reference could not be parsed as a profile.
    #[error("malformed profile data: {reason}")]
    BadProfiles {
        /// What failed to parse.
        reason: String,
    },

    /// Inputs and reference carry incompatible format versions.
    ///
    /// Must not be reported when [`ProfileOptions::boot_image_merge`] is
    /// set; that mode tolerates version skew and merges anyway.
    #[error("incompatible profile versions: {reason}")]
    IncompatibleVersions {
        /// Which versions clashed.
        reason: String,
    },
}

/// Result of merging inputs into the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeAnalysis {
    /// The merged profile, ready to replace the reference.
    pub merged: Vec<u8>,
    /// Whether the merge grew distinct methods/classes past the thresholds
    /// in [`ProfileOptions`].
    pub significant: bool,
}

/// Computes the merge of input profiles into a reference and judges whether
/// the difference is significant.
///
/// Implementations live outside this crate (the real profile toolchain);
/// tests substitute mocks.
pub trait SignificanceAnalyzer {
    /// Merges `inputs` into `reference` and applies the thresholds from
    /// `options`.
    ///
    /// # Errors
    ///
    /// [`AnalyzerError::BadProfiles`] for unparsable data and
    /// [`AnalyzerError::IncompatibleVersions`] for version skew (unless
    /// `options.boot_image_merge` tolerates it).
    fn analyze(
        &self,
        inputs: &[Vec<u8>],
        reference: &[u8],
        options: &ProfileOptions,
    ) -> Result<MergeAnalysis, AnalyzerError>;
}
