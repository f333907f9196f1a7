//! # Beat the Bomb Core Library
//!
//! This library provides the game logic for Beat the Bomb, a trivia quiz
//! in which a bomb's fuse burns down while the player answers questions.
//! Rendering, audio and input belong to the front-end; the core only keeps
//! time, scores answers and decides who defused the bomb.
//!
//! ## Architecture
//!
//! - **Fuse**: a delta-accumulating countdown with pause/resume accounting
//! - **Session Engine**: a frame-driven state machine that requires the
//!   caller to invoke `tick()` once per frame with the wall-clock delta
//! - **Quiz**: question-set schema and validation, answer evaluation, and the
//!   category catalog that picks a question slice
//! - **Storage**: TOML configuration, append-only score log and score history
//!
//! ## Key Components
//!
//! - [`FuseTimer`]: Countdown against a fixed budget
//! - [`SessionEngine`]: Question progression, scoring and win/lose
//! - [`AnswerEvaluator`]: Correctness to score and fuse adjustments
//! - [`ScoreLog`]: Score persistence

pub mod error;
pub mod events;
pub mod fuse;
pub mod quiz;
pub mod rules;
pub mod session;
pub mod storage;

pub use error::{CatalogError, ConfigError, CoreError, QuestionError, ScoreLogError, SessionError};
pub use events::Event;
pub use fuse::FuseTimer;
pub use quiz::{AnswerEvaluator, Catalog, Evaluation, Question, QuestionSet};
pub use rules::{Rules, Variant, WinThreshold};
pub use session::{FinalScore, GameOverReason, Outcome, SessionEngine, SessionState};
pub use storage::{Config, ScoreHistory, ScoreLog};
