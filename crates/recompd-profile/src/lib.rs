//! recompd-profile - Profile-merge significance gating.
//!
//! The peer decision engine to the compilation-log backoff: given freshly
//! collected runtime profiles and a reference baseline, decide whether the
//! accumulated profiling data differs enough to justify recompilation, and
//! if so replace the reference with the merged result.
//!
//! The actual profile diff/merge algorithm lives outside this crate behind
//! the [`SignificanceAnalyzer`] seam; this crate owns the orchestration:
//! exclusive advisory locks on every touched file, the structural error
//! taxonomy, and the stable result codes consumed by the installer-side
//! process orchestration.

pub mod analyzer;
pub mod assistant;
pub mod lock;
pub mod options;
pub mod result;

pub use analyzer::{AnalyzerError, MergeAnalysis, SignificanceAnalyzer};
pub use assistant::ProfileAssistant;
pub use lock::{FlockProfileLock, LockError, LockedProfile, ProfileLock};
pub use options::ProfileOptions;
pub use result::ProcessingResult;
