//! Core error types for beatthebomb-core.
//!
//! Errors fall into two groups. Contract violations ([`SessionError`]) are
//! programming errors on the caller's side and surface immediately. Data
//! errors ([`QuestionError`], [`CatalogError`]) are reported when content is
//! loaded, never swallowed.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for beatthebomb-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session engine contract violations
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Question set data errors
    #[error("Question set error: {0}")]
    Question(#[from] QuestionError),

    /// Catalog lookup and data errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Score log errors
    #[error("Score log error: {0}")]
    ScoreLog(#[from] ScoreLogError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Caller contract violations raised by the fuse and session engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Answer index outside the question's answers
    #[error("Answer index {index} out of bounds (question has {len} answers)")]
    AnswerOutOfRange { index: usize, len: usize },

    /// Operation requires a loaded question set
    #[error("No question set loaded")]
    NoSessionLoaded,

    /// Loading a new set while a session is running needs a reset first
    #[error("A session is already in progress; reset or unload it first")]
    SessionInProgress,

    /// Fuse budget must be a positive, finite number of seconds
    #[error("Invalid fuse budget: {0} seconds")]
    InvalidBudget(f64),
}

/// Question set data invariant violations, reported at load time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuestionError {
    /// A question set must contain at least one question
    #[error("Question set is empty")]
    EmptySet,

    /// Prompt text is blank
    #[error("Question {index} has an empty prompt")]
    EmptyPrompt { index: usize },

    /// Every question carries a fixed number of answers
    #[error("Question {index} has {found} answers, expected {expected}")]
    WrongAnswerCount {
        index: usize,
        found: usize,
        expected: usize,
    },

    /// Exactly one answer must be flagged correct
    #[error("Question {index} has {count} correct answers, expected exactly one")]
    CorrectAnswerCount { index: usize, count: usize },

    /// Requested slice does not fit the question bank
    #[error("Question range {start}..{end} out of bounds (bank has {len} questions)")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    /// Malformed JSON
    #[error("Failed to parse question set: {0}")]
    Parse(String),
}

/// Catalog lookup and data errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No node matches the given title path
    #[error("Unknown category: {0}")]
    UnknownPath(String),

    /// Path ends at a branch, not at a playable leaf
    #[error("Category '{0}' has no questions of its own; choose a subcategory")]
    NotALeaf(String),

    /// A node is neither a branch nor a leaf, or both
    #[error("Category '{0}' must have either children or a question range")]
    MalformedNode(String),

    /// Leaf range is empty or exceeds the question bank
    #[error("Category '{title}' selects questions {start}..{end}, bank has {len}")]
    InvalidRange {
        title: String,
        start: usize,
        end: usize,
        len: usize,
    },

    /// Malformed JSON
    #[error("Failed to parse catalog: {0}")]
    Parse(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Score log errors.
#[derive(Error, Debug)]
pub enum ScoreLogError {
    /// Appending a score failed
    #[error("Failed to append score to {path}: {source}")]
    AppendFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the log failed for a reason other than a missing file
    #[error("Failed to read score log at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for QuestionError {
    fn from(err: serde_json::Error) -> Self {
        QuestionError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
