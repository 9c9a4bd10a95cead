//! The compilation log: persisted attempt history plus the backoff decision.
//!
//! # Decision rule
//!
//! `should_attempt_compile` scans the retained window newest to oldest for
//! the most recent entry matching the candidate subject version and trigger
//! (an `Unknown` candidate trigger matches any stored trigger, deferring to
//! whatever backoff is already in force). No match means the attempt is the
//! first of its kind and is always allowed. Otherwise the elapsed time since
//! the matching entry must reach a backoff duration:
//!
//! - matching entry succeeded: half a day, a cooldown against thrashing on
//!   flaky triggers;
//! - `k` consecutive matching failures ending at it: `2^(k-1)` days, so a
//!   persistently broken compilation is retried ever more rarely.
//!
//! Non-matching entries interleaved in history are skipped without breaking
//! the failure run; a different trigger is an independent backoff track and
//! must not reset this one.
//!
//! # Durability
//!
//! When bound to a path, every mutation rewrites the whole retained window
//! through a temp file that replaces the log in one rename, so a crash
//! mid-write costs at most the newest entry, never the whole log. Hydration
//! is symmetric: it keeps the longest cleanly-decoding prefix and treats an
//! unreadable file like an absent one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::clock::{SystemTimeSource, TimeSource};
use crate::codec::{decode_entry, encode_entry};
use crate::entry::{CompilationLogEntry, CompilationOutcome, CompilationTrigger};
use crate::history::{BoundedHistory, MAX_LOGGED_ENTRIES};

/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Cooldown imposed after a successful attempt.
const SUCCESS_BACKOFF_SECONDS: i64 = SECONDS_PER_DAY / 2;

/// Backoff after a single failure; doubles with each consecutive failure.
const FAILURE_BACKOFF_BASE_SECONDS: i64 = SECONDS_PER_DAY;

/// Persistence failure for a path-bound log.
///
/// A log constructed with [`CompilationLog::in_memory`] never produces one.
#[derive(Debug, Error)]
pub enum CompilationLogError {
    /// The rewritten window could not be written or atomically swapped in.
    #[error("failed to persist compilation log {path}: {source}")]
    Persist {
        /// The bound log path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Bounded, optionally file-backed history of recompilation attempts and the
/// backoff decision over it.
///
/// Each instance is independent and single-threaded; concurrent processes
/// coordinate only through the persisted file, which is why both hydration
/// and rewrite tolerate mid-write readers.
pub struct CompilationLog {
    history: BoundedHistory,
    path: Option<PathBuf>,
    time_source: Box<dyn TimeSource>,
}

impl std::fmt::Debug for CompilationLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilationLog")
            .field("history", &self.history)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Default for CompilationLog {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl CompilationLog {
    /// Creates a purely in-memory log. No I/O is ever performed.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_parts(None, Box::new(SystemTimeSource))
    }

    /// Creates a log bound to `path`, hydrating the window from the file.
    ///
    /// An absent file is an empty log. A truncated or corrupt file yields
    /// the entries that decode before the first failure; a fully unreadable
    /// file is treated like an absent one. If the file holds more than
    /// [`MAX_LOGGED_ENTRIES`] lines only the newest are kept.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self::from_parts(Some(path.into()), Box::new(SystemTimeSource))
    }

    /// As [`CompilationLog::with_path`], with an explicit time source.
    #[must_use]
    pub fn with_path_and_time_source(
        path: impl Into<PathBuf>,
        time_source: Box<dyn TimeSource>,
    ) -> Self {
        Self::from_parts(Some(path.into()), time_source)
    }

    fn from_parts(path: Option<PathBuf>, time_source: Box<dyn TimeSource>) -> Self {
        let mut history = BoundedHistory::new(MAX_LOGGED_ENTRIES);
        if let Some(path) = path.as_deref() {
            hydrate(&mut history, path);
        }
        Self {
            history,
            path,
            time_source,
        }
    }

    /// Number of retained entries.
    #[must_use]
    pub fn number_of_entries(&self) -> usize {
        self.history.len()
    }

    /// The retained entry at `index` (oldest = 0).
    #[must_use]
    pub fn peek(&self, index: usize) -> Option<&CompilationLogEntry> {
        self.history.peek(index)
    }

    /// Decides whether a recompilation attempt for `subject_version` under
    /// `trigger` may run at time `now` (epoch seconds).
    ///
    /// Total over all inputs: empty history, extreme timestamps, and trigger
    /// codes outside the known set all produce a plain boolean.
    #[must_use]
    pub fn should_attempt_compile(
        &self,
        subject_version: i64,
        trigger: CompilationTrigger,
        now: i64,
    ) -> bool {
        let mut newest_match: Option<&CompilationLogEntry> = None;
        let mut failure_run: u32 = 0;

        for entry in self.history.iter().rev() {
            if entry.subject_version != subject_version {
                continue;
            }
            if trigger != CompilationTrigger::Unknown && entry.trigger != trigger.code() {
                continue;
            }
            if newest_match.is_none() {
                newest_match = Some(entry);
            }
            if entry.is_failure() {
                failure_run += 1;
            } else {
                break;
            }
        }

        let Some(entry) = newest_match else {
            debug!(subject_version, ?trigger, "no matching history; compilation allowed");
            return true;
        };

        let backoff_seconds = backoff_seconds_for_run(failure_run);
        let elapsed = i128::from(now) - i128::from(entry.when);
        let allowed = elapsed >= i128::from(backoff_seconds);
        debug!(
            subject_version,
            ?trigger,
            failure_run,
            backoff_seconds,
            allowed,
            "backoff decision"
        );
        allowed
    }

    /// As [`CompilationLog::should_attempt_compile`] at the current
    /// wall-clock time.
    #[must_use]
    pub fn should_attempt_compile_now(
        &self,
        subject_version: i64,
        trigger: CompilationTrigger,
    ) -> bool {
        self.should_attempt_compile(subject_version, trigger, self.time_source.now_epoch_seconds())
    }

    /// Records an attempt outcome. The only way history grows; eviction of
    /// the oldest entry past capacity is the only deletion.
    ///
    /// # Errors
    ///
    /// [`CompilationLogError::Persist`] if the log is path-bound and the
    /// rewrite fails. The in-memory window has already been updated.
    pub fn log(
        &mut self,
        subject_version: i64,
        trigger: CompilationTrigger,
        when: i64,
        outcome: CompilationOutcome,
    ) -> Result<(), CompilationLogError> {
        self.log_entry(CompilationLogEntry::new(
            subject_version,
            trigger.code(),
            when,
            outcome.code(),
        ))
    }

    /// Records an attempt outcome at the current wall-clock time.
    ///
    /// # Errors
    ///
    /// See [`CompilationLog::log`].
    pub fn log_now(
        &mut self,
        subject_version: i64,
        trigger: CompilationTrigger,
        outcome: CompilationOutcome,
    ) -> Result<(), CompilationLogError> {
        let now = self.time_source.now_epoch_seconds();
        self.log(subject_version, trigger, now, outcome)
    }

    fn log_entry(&mut self, entry: CompilationLogEntry) -> Result<(), CompilationLogError> {
        self.history.append(entry);
        self.persist()
    }

    fn persist(&self) -> Result<(), CompilationLogError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let mut contents = String::new();
        for entry in self.history.iter() {
            contents.push_str(&encode_entry(entry));
        }
        write_atomic(path, contents.as_bytes()).map_err(|source| CompilationLogError::Persist {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Backoff for a trailing failure run of length `k` (`k == 0` means the
/// newest matching entry was a success).
fn backoff_seconds_for_run(failure_run: u32) -> i64 {
    if failure_run == 0 {
        return SUCCESS_BACKOFF_SECONDS;
    }
    // The run length is bounded by the window capacity, but saturate anyway
    // so the predicate stays total if the capacity is ever raised.
    1_i64
        .checked_shl(failure_run - 1)
        .and_then(|doubling| doubling.checked_mul(FAILURE_BACKOFF_BASE_SECONDS))
        .unwrap_or(i64::MAX)
}

fn hydrate(history: &mut BoundedHistory, path: &Path) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return,
        Err(err) => {
            // An unreadable log is equivalent to an absent one; the engine
            // must come up working regardless.
            warn!(path = %path.display(), error = %err, "compilation log unreadable; starting empty");
            return;
        }
    };

    let mut tokens = contents.split_ascii_whitespace();
    loop {
        match decode_entry(&mut tokens) {
            Ok(Some(entry)) => history.append(entry),
            Ok(None) => break,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    retained = history.len(),
                    "compilation log partially decodable; keeping decoded prefix"
                );
                break;
            }
        }
    }
}

/// Writes `bytes` to `path` through a temp file in the same directory,
/// fsyncing before the rename so readers see the old window or the new one,
/// never a torn mix.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
