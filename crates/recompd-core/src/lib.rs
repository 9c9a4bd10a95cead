//! recompd-core - Compilation-log backoff scheduling.
//!
//! This crate answers one question for the on-device recompilation pipeline:
//! "should a recompilation attempt run right now?". It keeps a small, bounded,
//! optionally file-backed history of past attempts and applies an exponential
//! backoff over consecutive failures, with a short cooldown after a success.
//!
//! The engines here run unattended early in boot or inside background jobs,
//! so every persisted input is treated as potentially truncated or corrupt:
//! hydration keeps whatever prefix of the log decodes cleanly and the decision
//! predicate is total over all inputs.
//!
//! # Example
//!
//! ```
//! use recompd_core::{CompilationLog, CompilationOutcome, CompilationTrigger};
//!
//! let mut log = CompilationLog::in_memory();
//! assert!(log.should_attempt_compile(1, CompilationTrigger::VersionMismatch, 0));
//!
//! log.log(1, CompilationTrigger::VersionMismatch, 0, CompilationOutcome::Failed)
//!     .expect("in-memory log never fails to persist");
//!
//! // One failure imposes a one-day backoff for the same subject and trigger.
//! assert!(!log.should_attempt_compile(1, CompilationTrigger::VersionMismatch, 43_200));
//! assert!(log.should_attempt_compile(1, CompilationTrigger::VersionMismatch, 86_400));
//! ```

pub mod clock;
pub mod codec;
pub mod entry;
pub mod history;
pub mod log;

pub use clock::{SystemTimeSource, TimeSource};
pub use codec::{decode_entry, encode_entry, DecodeError};
pub use entry::{CompilationLogEntry, CompilationOutcome, CompilationTrigger};
pub use history::{BoundedHistory, MAX_LOGGED_ENTRIES};
pub use log::{CompilationLog, CompilationLogError, SECONDS_PER_DAY};
