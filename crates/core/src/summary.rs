// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Resumable scoring summary.
//!
//! A summary holds the number of decks scored so far and the running counts
//! for those decks, runs load it, merge new batches into it and save it back
//! so that a later run can continue from where the previous one stopped.
//!
//! A summary has a single writer, writers hold an exclusive lock on a `.lock`
//! file next to the summary for the whole load, merge and save sequence.
use bincode::Options;
use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use thiserror::Error;

use penney_eval::{MergeError, RunningCounts};

/// The summary file format version.
pub const SUMMARY_VERSION: u32 = 1;

/// Error raised when loading or saving a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Filesystem error.
    #[error("summary io error: {0}")]
    Io(#[from] io::Error),
    /// The summary file can't be decoded.
    #[error("summary decode error: {0}")]
    Decode(#[source] bincode::Error),
    /// The summary can't be encoded.
    #[error("summary encode error: {0}")]
    Encode(#[source] bincode::Error),
    /// The summary file has an unknown version.
    #[error("unsupported summary version {found}, expected {SUMMARY_VERSION}")]
    Version {
        /// The version found in the file.
        found: u32,
    },
    /// The summary counts don't agree with its number of decks.
    #[error("inconsistent summary: {0}")]
    Inconsistent(#[from] MergeError),
    /// Another writer holds the summary lock.
    #[error("summary {} is locked by another writer", path.display())]
    Locked {
        /// The lock file path.
        path: PathBuf,
    },
}

/// Total decks scored and their running counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    total_decks: u64,
    counts: RunningCounts,
}

impl Summary {
    /// Creates a summary checking the counts agree with the number of decks.
    pub fn new(total_decks: u64, counts: RunningCounts) -> Result<Self, MergeError> {
        counts.check(total_decks)?;
        Ok(Self {
            total_decks,
            counts,
        })
    }

    /// The number of decks scored.
    pub fn total_decks(&self) -> u64 {
        self.total_decks
    }

    /// The running counts.
    pub fn counts(&self) -> &RunningCounts {
        &self.counts
    }

    /// Merges the counts for a batch of `new_decks` decks.
    ///
    /// On error this summary is left unchanged.
    pub fn merge(&mut self, delta: &RunningCounts, new_decks: u64) -> Result<(), MergeError> {
        delta.check(new_decks)?;

        let total_decks = self
            .total_decks
            .checked_add(new_decks)
            .ok_or(MergeError::Overflow)?;
        let counts = self.counts.checked_add(delta)?;

        self.total_decks = total_decks;
        self.counts = counts;
        Ok(())
    }
}

/// On disk summary layout.
#[derive(Debug, Serialize, Deserialize)]
struct Record {
    version: u32,
    total_decks: u64,
    counts: RunningCounts,
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// A file backed summary.
///
/// Saving writes a uniquely named temporary file next to the summary and
/// renames it over the summary, readers see either the previous or the new
/// summary.
#[derive(Debug, Clone)]
pub struct SummaryStore {
    path: PathBuf,
}

impl SummaryStore {
    /// Creates a store for the summary at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The summary file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the summary, returns an empty summary if the file doesn't exist.
    pub fn load(&self) -> Result<Summary, SummaryError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Summary::default()),
            Err(e) => return Err(e.into()),
        };

        let record = codec()
            .deserialize::<Record>(&bytes)
            .map_err(SummaryError::Decode)?;

        if record.version != SUMMARY_VERSION {
            return Err(SummaryError::Version {
                found: record.version,
            });
        }

        Ok(Summary::new(record.total_decks, record.counts)?)
    }

    /// Saves the summary replacing the previous one.
    pub fn save(&self, summary: &Summary) -> Result<(), SummaryError> {
        let record = Record {
            version: SUMMARY_VERSION,
            total_decks: summary.total_decks,
            counts: summary.counts,
        };

        let bytes = codec().serialize(&record).map_err(SummaryError::Encode)?;

        // The temporary file is removed on drop if any step fails.
        let mut file = NamedTempFile::new_in(self.dir()?)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| SummaryError::Io(e.error))?;
        Ok(())
    }

    /// Calls `f` holding the summary exclusive lock.
    ///
    /// Fails with [SummaryError::Locked] without waiting if another writer,
    /// in this or another process, holds the lock.
    pub fn exclusive<T, F: FnOnce() -> T>(&self, f: F) -> Result<T, SummaryError> {
        let lock_path = self.lock_path();
        self.dir()?;

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;

        let mut lock = RwLock::new(file);
        let _guard = lock.try_write().map_err(|e| match e.kind() {
            io::ErrorKind::WouldBlock => SummaryError::Locked { path: lock_path },
            _ => SummaryError::Io(e),
        })?;

        Ok(f())
    }

    /// The lock file path.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Creates and returns the summary directory.
    fn dir(&self) -> Result<&Path, SummaryError> {
        match self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                Ok(dir)
            }
            None => Ok(Path::new(".")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penney_cards::{Deck, DeckSource, Shuffler};
    use penney_eval::aggregate;
    use tempfile::tempdir;

    fn summary(decks: &[Deck]) -> Summary {
        Summary::new(decks.len() as u64, aggregate(decks)).unwrap()
    }

    #[test]
    fn missing_summary_is_empty() {
        let dir = tempdir().unwrap();
        let store = SummaryStore::new(dir.path().join("none.bin"));

        let summary = store.load().unwrap();
        assert_eq!(summary.total_decks(), 0);
        assert!(summary.counts().is_empty());
    }

    #[test]
    fn save_and_load() {
        let dir = tempdir().unwrap();
        let store = SummaryStore::new(dir.path().join("data/summary.bin"));

        let saved = summary(&Shuffler.generate(30, 2003));
        store.save(&saved).unwrap();
        assert_eq!(store.load().unwrap(), saved);

        // Saving again replaces the summary and leaves no temporary file.
        let saved = summary(&Shuffler.generate(40, 1));
        store.save(&saved).unwrap();
        assert_eq!(store.load().unwrap(), saved);
        assert_eq!(fs::read_dir(dir.path().join("data")).unwrap().count(), 1);
    }

    #[test]
    fn failed_save_removes_temporary_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.bin");

        // A non empty directory where the summary should go.
        fs::create_dir_all(path.join("child")).unwrap();

        let store = SummaryStore::new(&path);
        let res = store.save(&summary(&Shuffler.generate(3, 1)));
        assert!(matches!(res, Err(SummaryError::Io(_))));

        let names = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect::<Vec<_>>();
        assert_eq!(names, ["summary.bin"]);
    }

    #[test]
    fn exclusive_lock() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data/summary.bin");
        let store = SummaryStore::new(&path);

        let inner = store
            .exclusive(|| SummaryStore::new(&path).exclusive(|| ()))
            .unwrap();
        assert!(matches!(inner, Err(SummaryError::Locked { .. })));
        assert!(store.lock_path().exists());

        // The lock is released when the writer is done.
        assert_eq!(store.exclusive(|| 7).unwrap(), 7);
    }

    #[test]
    fn merge_adds_up() {
        let decks = Shuffler.generate(25, 9);
        let mut merged = summary(&decks[..10]);
        merged.merge(&aggregate(&decks[10..]), 15).unwrap();
        assert_eq!(merged, summary(&decks));
        assert_eq!(merged.total_decks(), 25);
    }

    #[test]
    fn merge_empty_batch() {
        let mut s = summary(&Shuffler.generate(5, 2));
        let before = s;
        s.merge(&aggregate(&[]), 0).unwrap();
        assert_eq!(s, before);
    }

    #[test]
    fn failed_merge_leaves_summary() {
        let mut s = summary(&Shuffler.generate(5, 2));
        let before = s;

        // Counts for 10 decks merged as 2 decks.
        let delta = aggregate(&Shuffler.generate(10, 3));
        assert!(matches!(
            s.merge(&delta, 2),
            Err(MergeError::Exceeds { .. })
        ));
        assert_eq!(s, before);
    }

    #[test]
    fn corrupted_summary() {
        let dir = tempdir().unwrap();
        let store = SummaryStore::new(dir.path().join("summary.bin"));
        store.save(&summary(&Shuffler.generate(3, 4))).unwrap();

        let bytes = fs::read(store.path()).unwrap();

        // Truncated file.
        fs::write(store.path(), &bytes[..bytes.len() - 8]).unwrap();
        assert!(matches!(store.load(), Err(SummaryError::Decode(_))));

        // Trailing garbage.
        let mut longer = bytes.clone();
        longer.push(0);
        fs::write(store.path(), &longer).unwrap();
        assert!(matches!(store.load(), Err(SummaryError::Decode(_))));

        // Total smaller than the counts, total follows the 4 bytes version.
        let mut smaller = bytes.clone();
        smaller[4..12].copy_from_slice(&1u64.to_le_bytes());
        fs::write(store.path(), &smaller).unwrap();
        assert!(matches!(
            store.load(),
            Err(SummaryError::Inconsistent(MergeError::Exceeds { .. }))
        ));

        // Unknown version.
        let mut version = bytes;
        version[..4].copy_from_slice(&7u32.to_le_bytes());
        fs::write(store.path(), &version).unwrap();
        assert!(matches!(
            store.load(),
            Err(SummaryError::Version { found: 7 })
        ));
    }
}
