//! Scoped exclusive locking over profile files.
//!
//! Profile merges race across processes (an app process flushing its profile
//! against a background merge job), so every file touched by a run is held
//! under an exclusive advisory `flock` for the duration. The lock lives in a
//! guard released on drop, which covers every exit path including errors.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Failure to take an exclusive lock on a profile file.
///
/// Distinct from plain I/O errors so callers can retry the whole operation
/// later instead of treating the profile as broken.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process holds the lock.
    #[error("profile {path} is locked by another process")]
    Contended {
        /// The contended profile path.
        path: PathBuf,
    },

    /// The file could not be opened for locking.
    #[error("failed to open profile {path} for locking: {source}")]
    Open {
        /// The profile path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The lock syscall itself failed.
    #[error("failed to lock profile {path}: {source}")]
    Acquire {
        /// The profile path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Capability to take scoped exclusive locks on profile files.
///
/// A seam so the assistant orchestration is testable without real lock
/// contention; production code uses [`FlockProfileLock`].
pub trait ProfileLock {
    /// Opens `path` (creating it if absent) and takes an exclusive advisory
    /// lock, held until the returned guard drops.
    ///
    /// # Errors
    ///
    /// [`LockError::Contended`] when the lock is held elsewhere, otherwise
    /// the open/acquire failure.
    fn lock_exclusive(&self, path: &Path) -> Result<LockedProfile, LockError>;
}

/// A profile file held under an exclusive advisory lock.
///
/// All reads and writes go through the locked handle; the lock releases when
/// the guard drops.
#[derive(Debug)]
pub struct LockedProfile {
    file: File,
    path: PathBuf,
}

impl LockedProfile {
    /// The locked path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full file contents.
    ///
    /// # Errors
    ///
    /// Any underlying read failure.
    pub fn read_contents(&mut self) -> io::Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut contents = Vec::new();
        self.file.read_to_end(&mut contents)?;
        Ok(contents)
    }

    /// Replaces the full file contents and syncs to durable storage.
    ///
    /// Writes go through the locked descriptor so the exclusive lock keeps
    /// covering the bytes other processes will read. New contents land
    /// before the truncation so a failure mid-write leaves stale or mixed
    /// bytes, never an empty profile.
    ///
    /// # Errors
    ///
    /// Any underlying write or sync failure.
    pub fn replace_contents(&mut self, contents: &[u8]) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(contents)?;
        self.file.set_len(contents.len() as u64)?;
        self.file.sync_all()
    }
}

impl Drop for LockedProfile {
    fn drop(&mut self) {
        // Released by close anyway; unlocking eagerly keeps the scope tight.
        let _ = FileExt::unlock(&self.file);
    }
}

/// `flock(2)`-based [`ProfileLock`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FlockProfileLock;

impl ProfileLock for FlockProfileLock {
    fn lock_exclusive(&self, path: &Path) -> Result<LockedProfile, LockError> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|source| LockError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => Ok(LockedProfile {
                file,
                path: path.to_path_buf(),
            }),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Err(LockError::Contended {
                path: path.to_path_buf(),
            }),
            Err(source) => Err(LockError::Acquire {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
