//! Compilation-attempt records and their trigger/outcome codes.

use serde::{Deserialize, Serialize};

/// One recorded recompilation attempt.
///
/// Fields are stored as raw integers rather than the [`CompilationTrigger`]
/// and [`CompilationOutcome`] enums: the persisted log is an open format and
/// a newer (or older) writer may have recorded codes this build does not
/// know. The codec round-trips the full representable range of every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationLogEntry {
    /// Version of the runtime component the attempt compiled against.
    /// Compared for equality only; no ordering is assumed.
    pub subject_version: i64,
    /// Raw trigger code (see [`CompilationTrigger`]).
    pub trigger: i32,
    /// Attempt time in seconds since the Unix epoch. The full signed range
    /// is legal; device clocks jump backwards during early boot.
    pub when: i64,
    /// Raw outcome code (see [`CompilationOutcome`]).
    pub outcome: i32,
}

impl CompilationLogEntry {
    /// Creates an entry from raw field values.
    #[must_use]
    pub const fn new(subject_version: i64, trigger: i32, when: i64, outcome: i32) -> Self {
        Self {
            subject_version,
            trigger,
            when,
            outcome,
        }
    }

    /// Returns `true` if this attempt's outcome counts against the failure
    /// backoff. Every code other than success is failure-like.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.outcome != CompilationOutcome::Success.code()
    }
}

/// Why a recompilation attempt was considered.
///
/// The set is open: persisted entries may carry codes outside this enum.
/// `Unknown` has special matching semantics in the backoff engine (it defers
/// to whatever backoff is already in force for the subject instead of
/// starting an independent track).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompilationTrigger {
    /// The caller could not attribute a specific reason.
    Unknown,
    /// The subject's version changed since the last compilation.
    VersionMismatch,
    /// The compilation inputs changed.
    InputsChanged,
    /// Expected output artifacts are missing.
    MissingArtifacts,
}

impl CompilationTrigger {
    /// The stable wire code for this trigger.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::VersionMismatch => 1,
            Self::InputsChanged => 2,
            Self::MissingArtifacts => 3,
        }
    }
}

/// Result of a recompilation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompilationOutcome {
    /// The attempt produced usable artifacts.
    Success,
    /// The attempt ran and failed.
    Failed,
}

impl CompilationOutcome {
    /// The stable wire code for this outcome.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failed => 1,
        }
    }
}
