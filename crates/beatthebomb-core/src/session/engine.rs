//! Session engine implementation.
//!
//! Drives one game over a loaded question set. Like the fuse, it has no
//! clock or thread of its own: the UI calls `tick()` once per frame with the
//! wall-clock delta and renders from the returned events and queries.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> AwaitingAnswer -> ShowingFeedback -> (AwaitingAnswer | GameOver)
//!              |
//!              +-- fuse expired --> GameOver (lost)
//! ```
//!
//! `paused` is orthogonal to the state: it freezes the fuse and the feedback
//! window without changing where the session is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::events::Event;
use crate::fuse::{sanitize_secs, FuseTimer};
use crate::quiz::{AnswerEvaluator, Evaluation, Question, QuestionSet};
use crate::rules::Rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// Every question was answered; the outcome follows the score.
    AllAnswered,
    /// The fuse burned down before the question was answered.
    FuseExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No question set loaded.
    Idle,
    AwaitingAnswer,
    ShowingFeedback,
    GameOver {
        outcome: Outcome,
        reason: GameOverReason,
    },
}

impl SessionState {
    pub fn is_active(self) -> bool {
        matches!(
            self,
            SessionState::AwaitingAnswer | SessionState::ShowingFeedback
        )
    }
}

/// What the engine hands to the score sink when a game ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub score: u32,
    pub at: DateTime<Utc>,
}

/// The answer currently on display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Feedback {
    pub question_index: usize,
    pub answer_index: usize,
    pub evaluation: Evaluation,
    /// Session clock value at which the engine moves on.
    deadline_secs: f64,
}

/// Question progression and scoring over a [`FuseTimer`].
#[derive(Debug, Clone)]
pub struct SessionEngine {
    rules: Rules,
    evaluator: AnswerEvaluator,
    questions: Option<QuestionSet>,
    state: SessionState,
    question_index: usize,
    score: u32,
    selected_answer: Option<usize>,
    feedback: Option<Feedback>,
    fuse: FuseTimer,
    /// Unpaused time since the session (re)started.
    clock_secs: f64,
    final_score: Option<FinalScore>,
}

impl SessionEngine {
    /// Create an idle engine for the given rules.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidBudget`] if the rules' fuse budget is
    /// not a positive number of seconds.
    pub fn new(rules: Rules) -> Result<Self, SessionError> {
        let fuse = FuseTimer::new(rules.fuse_budget_secs)?;
        Ok(Self {
            evaluator: AnswerEvaluator::new(&rules),
            rules,
            questions: None,
            state: SessionState::Idle,
            question_index: 0,
            score: 0,
            selected_answer: None,
            feedback: None,
            fuse,
            clock_secs: 0.0,
            final_score: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.fuse.is_paused()
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn questions(&self) -> Option<&QuestionSet> {
        self.questions.as_ref()
    }

    pub fn question_count(&self) -> usize {
        self.questions.as_ref().map_or(0, QuestionSet::len)
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// The question on screen, if the session is in play.
    pub fn current_question(&self) -> Option<&Question> {
        if !self.state.is_active() {
            return None;
        }
        self.questions.as_ref()?.get(self.question_index)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.selected_answer
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn fuse(&self) -> &FuseTimer {
        &self.fuse
    }

    pub fn remaining_percentage(&self) -> f64 {
        self.fuse.remaining_percentage()
    }

    pub fn remaining_secs(&self) -> f64 {
        self.fuse.remaining_secs()
    }

    pub fn is_expired(&self) -> bool {
        self.fuse.is_expired()
    }

    pub fn win_threshold(&self) -> u32 {
        self.rules.win_threshold_for(self.question_count())
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            SessionState::GameOver { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// Set once the game is over; cleared by reset and reload.
    pub fn final_score(&self) -> Option<FinalScore> {
        self.final_score
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            paused: self.is_paused(),
            question_index: self.question_index,
            question_count: self.question_count(),
            selected_answer: self.selected_answer,
            score: self.score,
            win_threshold: self.win_threshold(),
            remaining_pct: self.remaining_percentage(),
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a session over `questions`.
    ///
    /// # Errors
    /// Returns [`SessionError::SessionInProgress`] while a game is running;
    /// call `reset()` or `unload()` first.
    pub fn load(&mut self, questions: QuestionSet) -> Result<Event, SessionError> {
        if self.state.is_active() {
            return Err(SessionError::SessionInProgress);
        }
        self.questions = Some(questions);
        self.restart();
        tracing::debug!(
            questions = self.question_count(),
            threshold = self.win_threshold(),
            "session started"
        );
        Ok(Event::SessionStarted {
            question_count: self.question_count(),
            win_threshold: self.win_threshold(),
            fuse_budget_secs: self.fuse.budget_secs(),
            at: Utc::now(),
        })
    }

    /// Drop the question set and go back to `Idle`.
    pub fn unload(&mut self) -> Option<Event> {
        if self.state == SessionState::Idle {
            return None;
        }
        self.questions = None;
        self.restart();
        Some(Event::SessionUnloaded { at: Utc::now() })
    }

    /// Start over from the first question with a full fuse. Works from any
    /// state; with nothing loaded the engine stays `Idle`.
    pub fn reset(&mut self) -> Event {
        self.restart();
        tracing::debug!(state = ?self.state, "session reset");
        Event::SessionReset { at: Utc::now() }
    }

    /// Answer the current question.
    ///
    /// Ignored (returns `Ok(None)`) unless the session is awaiting an answer
    /// and unpaused, so a second submission for the same question is a no-op.
    /// The question is hidden while paused, so input then is dropped too.
    ///
    /// # Errors
    /// Returns [`SessionError::NoSessionLoaded`] in `Idle`, or
    /// [`SessionError::AnswerOutOfRange`] for an index the question lacks.
    pub fn submit_answer(&mut self, answer_index: usize) -> Result<Option<Event>, SessionError> {
        match self.state {
            SessionState::Idle => return Err(SessionError::NoSessionLoaded),
            SessionState::AwaitingAnswer if !self.is_paused() => {}
            _ => return Ok(None),
        }

        let question = self
            .questions
            .as_ref()
            .and_then(|q| q.get(self.question_index))
            .ok_or(SessionError::NoSessionLoaded)?;
        let evaluation = self.evaluator.evaluate(question, answer_index)?;

        self.score = self.score.saturating_add(evaluation.score_delta);
        self.fuse.apply_penalty(evaluation.time_penalty_secs);
        self.fuse.apply_bonus(evaluation.time_bonus_secs);
        self.selected_answer = Some(answer_index);
        self.feedback = Some(Feedback {
            question_index: self.question_index,
            answer_index,
            evaluation,
            deadline_secs: self.clock_secs + sanitize_secs(self.rules.feedback_secs),
        });
        self.state = SessionState::ShowingFeedback;

        tracing::debug!(
            question = self.question_index,
            answer = answer_index,
            correct = evaluation.correct,
            score = self.score,
            "answer submitted"
        );
        Ok(Some(Event::AnswerSubmitted {
            question_index: self.question_index,
            answer_index,
            correct: evaluation.correct,
            correct_index: evaluation.correct_index,
            score: self.score,
            remaining_pct: self.fuse.remaining_percentage(),
            at: Utc::now(),
        }))
    }

    /// Pause or resume. No-op outside a running game or when unchanged.
    pub fn set_paused(&mut self, paused: bool) -> Option<Event> {
        if !self.state.is_active() || !self.fuse.set_paused(paused) {
            return None;
        }
        let remaining_pct = self.fuse.remaining_percentage();
        let at = Utc::now();
        Some(if paused {
            Event::Paused { remaining_pct, at }
        } else {
            Event::Resumed { remaining_pct, at }
        })
    }

    /// Call once per frame with the wall-clock delta since the last call.
    ///
    /// Burns the fuse while awaiting an answer, moves on when the feedback
    /// window closes, and ends the game when the fuse runs out.
    pub fn tick(&mut self, delta_secs: f64) -> Vec<Event> {
        if !self.state.is_active() {
            return Vec::new();
        }
        let delta = sanitize_secs(delta_secs);
        if self.is_paused() {
            // Recorded as paused time only.
            self.fuse.tick(delta);
            return Vec::new();
        }
        self.clock_secs += delta;

        match self.state {
            SessionState::AwaitingAnswer => {
                self.fuse.tick(delta);
                if self.fuse.is_expired() {
                    self.on_timer_expired()
                } else {
                    Vec::new()
                }
            }
            SessionState::ShowingFeedback => {
                let deadline = self.feedback.map_or(0.0, |fb| fb.deadline_secs);
                if self.clock_secs >= deadline {
                    self.advance()
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn restart(&mut self) {
        self.question_index = 0;
        self.score = 0;
        self.selected_answer = None;
        self.feedback = None;
        self.fuse.restart();
        self.clock_secs = 0.0;
        self.final_score = None;
        self.state = if self.questions.is_some() {
            SessionState::AwaitingAnswer
        } else {
            SessionState::Idle
        };
    }

    fn advance(&mut self) -> Vec<Event> {
        self.selected_answer = None;
        self.feedback = None;

        let next = self.question_index + 1;
        if next < self.question_count() {
            self.question_index = next;
            self.fuse.restart();
            self.state = SessionState::AwaitingAnswer;
            tracing::debug!(question = next, "advanced to next question");
            return vec![Event::QuestionAdvanced {
                question_index: next,
                at: Utc::now(),
            }];
        }

        self.question_index = self.question_count();
        let outcome = if self.score >= self.win_threshold() {
            Outcome::Won
        } else {
            Outcome::Lost
        };
        self.finish(outcome, GameOverReason::AllAnswered)
    }

    fn on_timer_expired(&mut self) -> Vec<Event> {
        let mut events = vec![Event::FuseExpired {
            question_index: self.question_index,
            at: Utc::now(),
        }];
        // An unanswered question always means the bomb goes off.
        events.extend(self.finish(Outcome::Lost, GameOverReason::FuseExpired));
        events
    }

    fn finish(&mut self, outcome: Outcome, reason: GameOverReason) -> Vec<Event> {
        let at = Utc::now();
        self.state = SessionState::GameOver { outcome, reason };
        self.final_score = Some(FinalScore {
            score: self.score,
            at,
        });
        tracing::info!(?outcome, ?reason, score = self.score, "game over");

        let mut events = Vec::with_capacity(2);
        if outcome == Outcome::Lost {
            events.push(Event::BombExploded { at });
        }
        events.push(Event::GameOver {
            outcome,
            reason,
            score: self.score,
            win_threshold: self.win_threshold(),
            at,
        });
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Answer;

    fn question_set(n: usize) -> QuestionSet {
        let questions = (0..n)
            .map(|i| {
                let answers = (0..4)
                    .map(|j| Answer::new(format!("answer {j}"), j == 0))
                    .collect();
                Question::new(format!("Question {i}"), answers).unwrap()
            })
            .collect();
        QuestionSet::new(questions).unwrap()
    }

    fn loaded(rules: Rules, n: usize) -> SessionEngine {
        let mut engine = SessionEngine::new(rules).unwrap();
        engine.load(question_set(n)).unwrap();
        engine
    }

    #[test]
    fn new_engine_is_idle() {
        let mut engine = SessionEngine::new(Rules::classic()).unwrap();
        assert_eq!(engine.state(), SessionState::Idle);
        assert!(engine.tick(1.0).is_empty());
        assert_eq!(engine.submit_answer(0), Err(SessionError::NoSessionLoaded));
        assert!(engine.set_paused(true).is_none());
    }

    #[test]
    fn invalid_budget_is_rejected() {
        let rules = Rules {
            fuse_budget_secs: 0.0,
            ..Rules::classic()
        };
        assert!(SessionEngine::new(rules).is_err());
    }

    #[test]
    fn load_starts_awaiting_answer() {
        let engine = loaded(Rules::classic(), 3);
        assert_eq!(engine.state(), SessionState::AwaitingAnswer);
        assert_eq!(engine.question_index(), 0);
        assert_eq!(engine.remaining_percentage(), 100.0);
        assert_eq!(engine.current_question().unwrap().prompt(), "Question 0");
    }

    #[test]
    fn load_mid_session_is_a_contract_violation() {
        let mut engine = loaded(Rules::classic(), 3);
        assert_eq!(
            engine.load(question_set(2)),
            Err(SessionError::SessionInProgress)
        );
        engine.submit_answer(0).unwrap();
        assert_eq!(
            engine.load(question_set(2)),
            Err(SessionError::SessionInProgress)
        );
    }

    #[test]
    fn correct_answer_scores_and_shows_feedback() {
        let mut engine = loaded(Rules::classic(), 3);
        let event = engine.submit_answer(0).unwrap().unwrap();
        assert!(matches!(event, Event::AnswerSubmitted { correct: true, score: 10, .. }));
        assert_eq!(engine.state(), SessionState::ShowingFeedback);
        assert_eq!(engine.selected_answer(), Some(0));
        assert!(engine.feedback().unwrap().evaluation.correct);
    }

    #[test]
    fn second_submission_is_ignored() {
        let mut engine = loaded(Rules::penalty(), 3);
        engine.submit_answer(1).unwrap();
        let pct = engine.remaining_percentage();
        assert_eq!(engine.submit_answer(0), Ok(None));
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.remaining_percentage(), pct);
        assert_eq!(engine.selected_answer(), Some(1));
    }

    #[test]
    fn out_of_range_answer_is_rejected_without_side_effects() {
        let mut engine = loaded(Rules::classic(), 3);
        assert_eq!(
            engine.submit_answer(7),
            Err(SessionError::AnswerOutOfRange { index: 7, len: 4 })
        );
        assert_eq!(engine.state(), SessionState::AwaitingAnswer);
        assert_eq!(engine.selected_answer(), None);
    }

    #[test]
    fn wrong_answer_in_penalty_variant_burns_fuse() {
        let mut engine = loaded(Rules::penalty(), 3);
        engine.submit_answer(2).unwrap();
        assert!((engine.remaining_percentage() - 85.0).abs() < 1e-9);
    }

    #[test]
    fn fuse_is_frozen_during_feedback() {
        let mut engine = loaded(Rules::classic(), 3);
        engine.tick(4.0);
        engine.submit_answer(0).unwrap();
        let pct = engine.remaining_percentage();
        engine.tick(0.5);
        assert_eq!(engine.remaining_percentage(), pct);
    }

    #[test]
    fn feedback_window_advances_and_restarts_fuse() {
        let mut engine = loaded(Rules::classic(), 3);
        engine.tick(4.0);
        engine.submit_answer(0).unwrap();
        assert!(engine.tick(0.5).is_empty());
        let events = engine.tick(0.5);
        assert!(matches!(events[..], [Event::QuestionAdvanced { question_index: 1, .. }]));
        assert_eq!(engine.state(), SessionState::AwaitingAnswer);
        assert_eq!(engine.selected_answer(), None);
        assert_eq!(engine.remaining_percentage(), 100.0);
    }

    #[test]
    fn paused_feedback_window_does_not_advance() {
        let mut engine = loaded(Rules::classic(), 3);
        engine.submit_answer(0).unwrap();
        engine.set_paused(true);
        assert!(engine.tick(5.0).is_empty());
        assert_eq!(engine.state(), SessionState::ShowingFeedback);
        engine.set_paused(false);
        assert!(!engine.tick(1.0).is_empty());
        assert_eq!(engine.question_index(), 1);
    }

    #[test]
    fn submission_while_paused_is_ignored() {
        let mut engine = loaded(Rules::classic(), 3);
        engine.set_paused(true);
        assert_eq!(engine.submit_answer(0), Ok(None));
        assert_eq!(engine.state(), SessionState::AwaitingAnswer);
    }

    #[test]
    fn pause_toggle_is_idempotent() {
        let mut engine = loaded(Rules::classic(), 3);
        assert!(engine.set_paused(true).is_some());
        assert!(engine.set_paused(true).is_none());
        assert!(engine.set_paused(false).is_some());
        assert!(engine.set_paused(false).is_none());
    }

    #[test]
    fn expiry_is_always_a_loss() {
        let rules = Rules {
            win_threshold: crate::rules::WinThreshold::Flat { points: 0 },
            ..Rules::classic()
        };
        let mut engine = loaded(rules, 2);
        let events = engine.tick(25.0);
        assert!(matches!(events[0], Event::FuseExpired { question_index: 0, .. }));
        assert!(matches!(events[1], Event::BombExploded { .. }));
        assert!(matches!(events[2], Event::GameOver { outcome: Outcome::Lost, .. }));
        assert_eq!(
            engine.state(),
            SessionState::GameOver {
                outcome: Outcome::Lost,
                reason: GameOverReason::FuseExpired
            }
        );
        assert!(engine.current_question().is_none());
    }

    #[test]
    fn penalty_that_empties_fuse_still_advances_with_fresh_fuse() {
        let mut engine = loaded(Rules::penalty(), 3);
        engine.tick(18.0);
        engine.submit_answer(1).unwrap();
        assert!(engine.is_expired());
        assert_eq!(engine.state(), SessionState::ShowingFeedback);

        let events = engine.tick(1.0);
        assert!(matches!(events[..], [Event::QuestionAdvanced { question_index: 1, .. }]));
        assert_eq!(engine.state(), SessionState::AwaitingAnswer);
        assert_eq!(engine.remaining_percentage(), 100.0);
        assert!(engine.outcome().is_none());
    }

    #[test]
    fn emptied_fuse_on_last_question_is_scored_not_exploded() {
        // Two questions, threshold ceil(0.5 * 20) = 10.
        let mut engine = loaded(Rules::penalty(), 2);
        engine.submit_answer(0).unwrap();
        engine.tick(1.0);
        engine.tick(18.0);
        engine.submit_answer(1).unwrap();
        assert!(engine.is_expired());

        let events = engine.tick(1.0);
        assert!(!events.iter().any(|e| matches!(e, Event::FuseExpired { .. })));
        assert_eq!(engine.score(), 10);
        assert_eq!(
            engine.state(),
            SessionState::GameOver {
                outcome: Outcome::Won,
                reason: GameOverReason::AllAnswered
            }
        );
    }

    #[test]
    fn game_over_ignores_input_and_pause() {
        let mut engine = loaded(Rules::classic(), 1);
        engine.tick(30.0);
        assert_eq!(engine.submit_answer(0), Ok(None));
        assert!(engine.set_paused(true).is_none());
        assert!(engine.tick(1.0).is_empty());
    }

    #[test]
    fn final_score_is_emitted_once_game_ends() {
        let mut engine = loaded(Rules::classic(), 1);
        assert!(engine.final_score().is_none());
        engine.submit_answer(0).unwrap();
        engine.tick(1.0);
        assert_eq!(engine.final_score().map(|f| f.score), Some(10));
    }

    #[test]
    fn reset_from_game_over_replays() {
        let mut engine = loaded(Rules::classic(), 2);
        engine.submit_answer(0).unwrap();
        engine.tick(30.0);
        engine.tick(30.0);
        assert!(engine.outcome().is_some());

        engine.reset();
        assert_eq!(engine.state(), SessionState::AwaitingAnswer);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.question_index(), 0);
        assert_eq!(engine.remaining_percentage(), 100.0);
        assert!(engine.final_score().is_none());
    }

    #[test]
    fn reset_clears_pause() {
        let mut engine = loaded(Rules::classic(), 2);
        engine.set_paused(true);
        engine.reset();
        assert!(!engine.is_paused());
    }

    #[test]
    fn reset_without_questions_stays_idle() {
        let mut engine = SessionEngine::new(Rules::classic()).unwrap();
        engine.reset();
        assert_eq!(engine.state(), SessionState::Idle);
    }

    #[test]
    fn unload_returns_to_idle() {
        let mut engine = loaded(Rules::classic(), 2);
        assert!(engine.unload().is_some());
        assert_eq!(engine.state(), SessionState::Idle);
        assert_eq!(engine.question_count(), 0);
        assert!(engine.unload().is_none());
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut engine = loaded(Rules::penalty(), 4);
        engine.tick(5.0);
        match engine.snapshot() {
            Event::StateSnapshot {
                state,
                question_count,
                win_threshold,
                remaining_pct,
                ..
            } => {
                assert_eq!(state, SessionState::AwaitingAnswer);
                assert_eq!(question_count, 4);
                assert_eq!(win_threshold, 20);
                assert!((remaining_pct - 75.0).abs() < 1e-9);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
