use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{GameOverReason, Outcome, SessionState};

/// Every state change in the session engine produces an Event.
/// The UI renders from them; the score sink listens for `GameOver`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        question_count: usize,
        win_threshold: u32,
        fuse_budget_secs: f64,
        at: DateTime<Utc>,
    },
    AnswerSubmitted {
        question_index: usize,
        answer_index: usize,
        correct: bool,
        correct_index: usize,
        score: u32,
        remaining_pct: f64,
        at: DateTime<Utc>,
    },
    QuestionAdvanced {
        question_index: usize,
        at: DateTime<Utc>,
    },
    Paused {
        remaining_pct: f64,
        at: DateTime<Utc>,
    },
    Resumed {
        remaining_pct: f64,
        at: DateTime<Utc>,
    },
    FuseExpired {
        question_index: usize,
        at: DateTime<Utc>,
    },
    /// Side-effect notification for collaborators (sound, animation).
    BombExploded {
        at: DateTime<Utc>,
    },
    GameOver {
        outcome: Outcome,
        reason: GameOverReason,
        score: u32,
        win_threshold: u32,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    SessionUnloaded {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        paused: bool,
        question_index: usize,
        question_count: usize,
        selected_answer: Option<usize>,
        score: u32,
        win_threshold: u32,
        remaining_pct: f64,
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
}
