//! Text codec for compilation-log entries.
//!
//! The persisted log is a plain-text file of newline-terminated lines, each
//! line four whitespace-separated decimal integers in fixed order: subject
//! version, trigger, timestamp, outcome. The decoder operates on a whitespace
//! token stream so back-to-back entries decode sequentially, and it fails
//! *recoverably* on truncated or malformed input: hydration keeps whatever
//! prefix decoded cleanly instead of faulting, because the log is routinely
//! read right after a crash or power cut mid-write.

use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;

use crate::entry::CompilationLogEntry;

/// A recoverable decode failure. Callers treat any variant as "no further
/// entries"; neither is ever escalated to a process-fatal error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The stream ended with a partial entry (1 to 3 tokens).
    #[error("truncated log entry: expected 4 fields, found {found}")]
    Truncated {
        /// Number of tokens that were available.
        found: usize,
    },

    /// A token was present but not a decimal integer in range.
    #[error("malformed {field} field: {token:?}")]
    Malformed {
        /// Which entry field the token was decoded as.
        field: &'static str,
        /// The offending token.
        token: String,
    },
}

/// Encodes one entry as its single-line text form, newline-terminated.
#[must_use]
pub fn encode_entry(entry: &CompilationLogEntry) -> String {
    let mut line = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(
        line,
        "{} {} {} {}",
        entry.subject_version, entry.trigger, entry.when, entry.outcome
    );
    line
}

/// Decodes the next entry from a whitespace token stream.
///
/// Returns `Ok(None)` on clean end of input (zero tokens left). On success
/// the stream is positioned after the fourth token, ready for the next entry.
///
/// # Errors
///
/// [`DecodeError::Truncated`] when fewer than four tokens remain and
/// [`DecodeError::Malformed`] when a token is not a decimal integer. Both are
/// recoverable: the caller proceeds with the entries already decoded.
pub fn decode_entry<'a, I>(tokens: &mut I) -> Result<Option<CompilationLogEntry>, DecodeError>
where
    I: Iterator<Item = &'a str>,
{
    let Some(version) = tokens.next() else {
        return Ok(None);
    };
    let trigger = tokens.next().ok_or(DecodeError::Truncated { found: 1 })?;
    let when = tokens.next().ok_or(DecodeError::Truncated { found: 2 })?;
    let outcome = tokens.next().ok_or(DecodeError::Truncated { found: 3 })?;

    Ok(Some(CompilationLogEntry {
        subject_version: parse_field("subject version", version)?,
        trigger: parse_field("trigger", trigger)?,
        when: parse_field("timestamp", when)?,
        outcome: parse_field("outcome", outcome)?,
    }))
}

fn parse_field<T: FromStr>(field: &'static str, token: &str) -> Result<T, DecodeError> {
    token.parse().map_err(|_| DecodeError::Malformed {
        field,
        token: token.to_string(),
    })
}
