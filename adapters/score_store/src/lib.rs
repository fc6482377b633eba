#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistent storage for the single best score.
//!
//! The simulation treats the store as best effort: reads fall back to zero and
//! failed writes are logged and dropped.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Best-effort high score persistence.
pub trait ScoreStore {
    /// Reads the stored best score, or 0 when none is available.
    fn read_high_score(&mut self) -> u32;

    /// Persists a new best score. Failures are swallowed.
    fn write_high_score(&mut self, score: u32);
}

impl<T: ScoreStore + ?Sized> ScoreStore for Box<T> {
    fn read_high_score(&mut self) -> u32 {
        (**self).read_high_score()
    }

    fn write_high_score(&mut self, score: u32) {
        (**self).write_high_score(score);
    }
}

/// Failures raised while accessing the high score file.
#[derive(Debug, Error)]
pub enum ScoreStoreError {
    /// Reading or writing the file failed.
    #[error("could not access high score file {path}")]
    Io {
        /// File that was accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file exists but is not a valid high score document.
    #[error("could not parse high score file {path}")]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying TOML failure.
        #[source]
        source: toml::de::Error,
    },
    /// The score could not be encoded.
    #[error("could not encode high score")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct HighScoreDocument {
    #[serde(default)]
    high_score: u32,
}

/// Stores the best score in a small TOML document (`high_score = N`).
#[derive(Clone, Debug)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    /// Creates a store backed by the file at `path`. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored score. A missing file counts as a score of 0.
    pub fn load(&self) -> Result<u32, ScoreStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(ScoreStoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let document: HighScoreDocument =
            toml::from_str(&contents).map_err(|source| ScoreStoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(document.high_score)
    }

    /// Writes the score, creating parent directories as needed.
    pub fn save(&self, score: u32) -> Result<(), ScoreStoreError> {
        let contents = toml::to_string(&HighScoreDocument { high_score: score })?;
        let io_error = |source| ScoreStoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_error)?;
            }
        }
        fs::write(&self.path, contents).map_err(io_error)
    }
}

impl ScoreStore for FileScoreStore {
    fn read_high_score(&mut self) -> u32 {
        match self.load() {
            Ok(score) => score,
            Err(error) => {
                warn!("ignoring unreadable high score: {error}");
                0
            }
        }
    }

    fn write_high_score(&mut self, score: u32) {
        match self.save(score) {
            Ok(()) => debug!("high score {score} saved to {}", self.path.display()),
            Err(error) => warn!("dropping high score {score}: {error}"),
        }
    }
}

/// Keeps the best score in memory only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryScoreStore {
    high_score: u32,
    writes: usize,
}

impl MemoryScoreStore {
    /// Creates a store that already holds `high_score`.
    #[must_use]
    pub const fn with_high_score(high_score: u32) -> Self {
        Self {
            high_score,
            writes: 0,
        }
    }

    /// Last score written or seeded.
    #[must_use]
    pub const fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Number of writes received.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl ScoreStore for MemoryScoreStore {
    fn read_high_score(&mut self) -> u32 {
        self.high_score
    }

    fn write_high_score(&mut self, score: u32) {
        self.high_score = score;
        self.writes = self.writes.saturating_add(1);
    }
}
