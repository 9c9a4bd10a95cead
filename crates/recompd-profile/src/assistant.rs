//! Orchestration of a profile-processing run.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::analyzer::{AnalyzerError, SignificanceAnalyzer};
use crate::lock::{LockedProfile, ProfileLock};
use crate::options::ProfileOptions;
use crate::result::ProcessingResult;

/// Decides whether freshly collected profiles justify recompilation.
///
/// A run locks every involved file exclusively, reads them under lock, asks
/// the [`SignificanceAnalyzer`] for a merged artifact and a verdict, and on a
/// compile verdict replaces the reference contents in place. On a skip
/// verdict no file is modified. Errors are reported through the stable
/// [`ProcessingResult`] codes; the operation never partially writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileAssistant;

impl ProfileAssistant {
    /// Processes `input_paths` against `reference_path`.
    ///
    /// All error outcomes are encoded in the returned [`ProcessingResult`]
    /// so the caller can forward it directly as a process exit code. Every
    /// lock taken is released on return, on success and failure alike.
    #[must_use]
    pub fn process_profiles(
        locker: &dyn ProfileLock,
        analyzer: &dyn SignificanceAnalyzer,
        input_paths: &[PathBuf],
        reference_path: &Path,
        options: &ProfileOptions,
    ) -> ProcessingResult {
        // Lock acquisition aborts the whole run: proceeding with a subset
        // of the inputs would merge a torn snapshot.
        let mut reference = match locker.lock_exclusive(reference_path) {
            Ok(lock) => lock,
            Err(err) => {
                warn!(error = %err, "aborting profile processing: reference not lockable");
                return ProcessingResult::ErrorCannotLock;
            }
        };
        let mut inputs: Vec<LockedProfile> = Vec::with_capacity(input_paths.len());
        for path in input_paths {
            match locker.lock_exclusive(path) {
                Ok(lock) => inputs.push(lock),
                Err(err) => {
                    warn!(error = %err, "aborting profile processing: input not lockable");
                    return ProcessingResult::ErrorCannotLock;
                }
            }
        }

        let reference_bytes = match reference.read_contents() {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %reference.path().display(), error = %err, "failed to read reference profile");
                return ProcessingResult::ErrorIo;
            }
        };
        let mut input_bytes = Vec::with_capacity(inputs.len());
        for input in &mut inputs {
            match input.read_contents() {
                Ok(bytes) => input_bytes.push(bytes),
                Err(err) => {
                    warn!(path = %input.path().display(), error = %err, "failed to read input profile");
                    return ProcessingResult::ErrorIo;
                }
            }
        }

        let analysis = match analyzer.analyze(&input_bytes, &reference_bytes, options) {
            Ok(analysis) => analysis,
            Err(AnalyzerError::BadProfiles { reason }) => {
                warn!(%reason, "input profiles rejected");
                return ProcessingResult::ErrorBadProfiles;
            }
            Err(AnalyzerError::IncompatibleVersions { reason }) => {
                warn!(%reason, "profile version mismatch");
                return ProcessingResult::ErrorDifferentVersions;
            }
        };

        if !analysis.significant && !options.force_merge {
            debug!("profile difference insignificant; skipping compilation");
            return ProcessingResult::SkipCompilation;
        }

        if options.force_merge && !analysis.significant {
            debug!("forced merge: bypassing significance verdict");
        }
        match reference.replace_contents(&analysis.merged) {
            Ok(()) => {
                debug!(
                    path = %reference.path().display(),
                    merged_len = analysis.merged.len(),
                    "reference profile updated; compilation advised"
                );
                ProcessingResult::Compile
            }
            Err(err) => {
                warn!(path = %reference.path().display(), error = %err, "failed to write merged profile");
                ProcessingResult::ErrorIo
            }
        }
    }
}
