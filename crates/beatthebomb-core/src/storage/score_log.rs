//! Append-only score log.
//!
//! One line per finished game, `YYYY-MM-DD HH:MM:SS,score`, in local time.
//! Lines that do not parse are skipped with a warning so a hand-edited or
//! truncated log never blocks play.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{CoreError, ScoreLogError};
use crate::session::FinalScore;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_NAME: &str = "scores.csv";

/// One recorded game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub recorded_at: NaiveDateTime,
    pub score: u32,
}

impl ScoreEntry {
    fn to_line(&self) -> String {
        format!("{},{}", self.recorded_at.format(TIMESTAMP_FORMAT), self.score)
    }

    fn parse(line: &str) -> Option<Self> {
        let (ts, score) = line.trim().split_once(',')?;
        Some(Self {
            recorded_at: NaiveDateTime::parse_from_str(ts.trim(), TIMESTAMP_FORMAT).ok()?,
            score: score.trim().parse().ok()?,
        })
    }
}

impl From<FinalScore> for ScoreEntry {
    fn from(fs: FinalScore) -> Self {
        Self {
            recorded_at: local_naive(fs.at),
            score: fs.score,
        }
    }
}

fn local_naive(at: DateTime<Utc>) -> NaiveDateTime {
    at.with_timezone(&Local).naive_local()
}

/// File-backed score sink.
#[derive(Debug, Clone)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    /// Open the log at `~/.config/beatthebomb/scores.csv`.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, CoreError> {
        Ok(Self::at(data_dir()?.join(FILE_NAME)))
    }

    /// Use an explicit file (tests, `--scores` overrides).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one final score.
    ///
    /// # Errors
    /// Returns [`ScoreLogError::AppendFailed`] if the file cannot be opened
    /// or written.
    pub fn append(&self, score: FinalScore) -> Result<ScoreEntry, ScoreLogError> {
        let entry = ScoreEntry::from(score);
        let fail = |source: std::io::Error| ScoreLogError::AppendFailed {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(fail)?;
        writeln!(file, "{}", entry.to_line()).map_err(fail)?;
        tracing::debug!(path = %self.path.display(), score = entry.score, "score recorded");
        Ok(entry)
    }

    /// Read every well-formed entry, oldest first. A missing file is an
    /// empty history.
    ///
    /// # Errors
    /// Returns [`ScoreLogError::ReadFailed`] for IO errors other than
    /// "not found".
    pub fn read_all(&self) -> Result<Vec<ScoreEntry>, ScoreLogError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ScoreLogError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let entries = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(n, line)| {
                let entry = ScoreEntry::parse(line);
                if entry.is_none() {
                    tracing::warn!(line = n + 1, path = %self.path.display(), "skipping malformed score line");
                }
                entry
            })
            .collect();
        Ok(entries)
    }
}
