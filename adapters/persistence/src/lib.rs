#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-score storage for Tron Rider.
//!
//! The record is a single decimal integer in a text file. Reads never fail:
//! a missing, unreadable or malformed record counts as zero. Writes land in a
//! sibling temporary file that is then renamed over the record, so a crash
//! mid-write leaves the previous best in place.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tron_rider_core::ScoreStore;

/// File name used when no explicit record path is configured.
pub const DEFAULT_HIGH_SCORE_FILE: &str = "highscore.txt";

/// Errors reported while writing a best-score record.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The temporary record could not be written.
    #[error("failed to write best score to {path}")]
    Write {
        /// Temporary file that was being written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The temporary record could not replace the existing one.
    #[error("failed to replace best score record {path}")]
    Replace {
        /// Record that was being replaced.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Interprets the textual content of a record.
///
/// Surrounding whitespace is tolerated; anything that is not a non-negative
/// integer yields `None`.
#[must_use]
pub fn parse_record(content: &str) -> Option<u32> {
    content.trim().parse().ok()
}

/// Best score persisted as a decimal integer in a text file.
#[derive(Clone, Debug)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    /// Creates a store that keeps its record at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| DEFAULT_HIGH_SCORE_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_SCORE_FILE)
    }
}

impl ScoreStore for FileScoreStore {
    type Error = PersistenceError;

    fn load_best_score(&self) -> u32 {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return 0,
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "best score unreadable");
                return 0;
            }
        };

        parse_record(&content).unwrap_or_else(|| {
            tracing::warn!(path = %self.path.display(), "best score record is corrupt");
            0
        })
    }

    fn save_best_score(&mut self, candidate: u32) -> Result<bool, Self::Error> {
        if candidate <= self.load_best_score() {
            return Ok(false);
        }

        let staging = self.staging_path();
        fs::write(&staging, candidate.to_string()).map_err(|source| PersistenceError::Write {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &self.path).map_err(|source| PersistenceError::Replace {
            path: self.path.clone(),
            source,
        })?;
        Ok(true)
    }
}

/// Best score kept in memory for tests and throwaway sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryScoreStore {
    best: u32,
}

impl MemoryScoreStore {
    /// Creates a store that starts with `best` on record.
    #[must_use]
    pub const fn with_best(best: u32) -> Self {
        Self { best }
    }
}

impl ScoreStore for MemoryScoreStore {
    type Error = std::convert::Infallible;

    fn load_best_score(&self) -> u32 {
        self.best
    }

    fn save_best_score(&mut self, candidate: u32) -> Result<bool, Self::Error> {
        if candidate <= self.best {
            return Ok(false);
        }
        self.best = candidate;
        Ok(true)
    }
}
