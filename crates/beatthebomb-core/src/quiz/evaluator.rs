//! Maps a selected answer to score and fuse adjustments.

use serde::{Deserialize, Serialize};

use super::question::Question;
use crate::error::SessionError;
use crate::rules::Rules;

/// Outcome of answering one question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub correct: bool,
    /// Index of the correct answer, for highlighting after a miss.
    pub correct_index: usize,
    pub score_delta: u32,
    pub time_penalty_secs: f64,
    pub time_bonus_secs: f64,
}

/// Pure scoring function configured from a variant's [`Rules`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerEvaluator {
    points_per_correct: u32,
    wrong_answer_penalty_secs: f64,
    correct_answer_bonus_secs: f64,
}

impl AnswerEvaluator {
    pub fn new(rules: &Rules) -> Self {
        Self {
            points_per_correct: rules.points_per_correct,
            wrong_answer_penalty_secs: rules.wrong_answer_penalty_secs.max(0.0),
            correct_answer_bonus_secs: rules.correct_answer_bonus_secs.max(0.0),
        }
    }

    /// # Errors
    /// Returns [`SessionError::AnswerOutOfRange`] if `answer_index` does not
    /// name one of the question's answers.
    pub fn evaluate(
        &self,
        question: &Question,
        answer_index: usize,
    ) -> Result<Evaluation, SessionError> {
        let answer = question
            .answer(answer_index)
            .ok_or(SessionError::AnswerOutOfRange {
                index: answer_index,
                len: question.answers().len(),
            })?;

        let evaluation = if answer.correct {
            Evaluation {
                correct: true,
                correct_index: question.correct_index(),
                score_delta: self.points_per_correct,
                time_penalty_secs: 0.0,
                time_bonus_secs: self.correct_answer_bonus_secs,
            }
        } else {
            Evaluation {
                correct: false,
                correct_index: question.correct_index(),
                score_delta: 0,
                time_penalty_secs: self.wrong_answer_penalty_secs,
                time_bonus_secs: 0.0,
            }
        };
        Ok(evaluation)
    }
}

impl Default for AnswerEvaluator {
    fn default() -> Self {
        Self::new(&Rules::default())
    }
}
