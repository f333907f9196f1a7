//! Question set schema and load-time validation.
//!
//! The on-disk format is a JSON array:
//!
//! ```json
//! [
//!   {
//!     "question": "What is the chemical symbol for gold?",
//!     "answers": [
//!       { "text": "Au", "correct": true },
//!       { "text": "Ag", "correct": false },
//!       { "text": "Gd", "correct": false },
//!       { "text": "Go", "correct": false }
//!     ]
//!   }
//! ]
//! ```

use std::ops::Range;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, QuestionError};

/// Number of answers every question offers.
pub const ANSWERS_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub correct: bool,
}

impl Answer {
    pub fn new(text: impl Into<String>, correct: bool) -> Self {
        Self {
            text: text.into(),
            correct,
        }
    }
}

/// A validated question: non-empty prompt, [`ANSWERS_PER_QUESTION`] answers,
/// exactly one of them correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    #[serde(rename = "question")]
    prompt: String,
    answers: Vec<Answer>,
    #[serde(skip)]
    correct_index: usize,
}

/// Unvalidated wire form.
#[derive(Deserialize)]
struct RawQuestion {
    question: String,
    answers: Vec<Answer>,
}

impl Question {
    /// Build a question, checking its invariants.
    ///
    /// `index` is only used to label errors.
    fn validated(
        index: usize,
        prompt: String,
        answers: Vec<Answer>,
    ) -> Result<Self, QuestionError> {
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { index });
        }
        if answers.len() != ANSWERS_PER_QUESTION {
            return Err(QuestionError::WrongAnswerCount {
                index,
                found: answers.len(),
                expected: ANSWERS_PER_QUESTION,
            });
        }
        let count = answers.iter().filter(|a| a.correct).count();
        if count != 1 {
            return Err(QuestionError::CorrectAnswerCount { index, count });
        }
        let correct_index = answers
            .iter()
            .position(|a| a.correct)
            .ok_or(QuestionError::CorrectAnswerCount { index, count: 0 })?;
        Ok(Self {
            prompt,
            answers,
            correct_index,
        })
    }

    /// Build a standalone question.
    ///
    /// # Errors
    /// Returns a [`QuestionError`] if any invariant does not hold.
    pub fn new(prompt: impl Into<String>, answers: Vec<Answer>) -> Result<Self, QuestionError> {
        Self::validated(0, prompt.into(), answers)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.answers.get(index)
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }
}

/// An ordered, non-empty sequence of validated questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// # Errors
    /// Returns [`QuestionError::EmptySet`] for an empty list.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        if questions.is_empty() {
            return Err(QuestionError::EmptySet);
        }
        Ok(Self { questions })
    }

    /// Parse and validate a JSON question set.
    ///
    /// # Errors
    /// Returns a [`QuestionError`] naming the first offending question.
    pub fn from_json(json: &str) -> Result<Self, QuestionError> {
        let raw: Vec<RawQuestion> = serde_json::from_str(json)?;
        let questions = raw
            .into_iter()
            .enumerate()
            .map(|(i, q)| Question::validated(i, q.question, q.answers))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    /// Read and validate a question set file.
    ///
    /// # Errors
    /// Returns an IO error if the file cannot be read, or a question error
    /// if the content is invalid.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let set = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), questions = set.len(), "loaded question set");
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed set; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    /// Copy out a contiguous sub-range as its own set.
    ///
    /// # Errors
    /// Returns [`QuestionError::RangeOutOfBounds`] for an empty or
    /// out-of-bounds range.
    pub fn slice(&self, range: Range<usize>) -> Result<Self, QuestionError> {
        if range.start >= range.end || range.end > self.questions.len() {
            return Err(QuestionError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len: self.questions.len(),
            });
        }
        Ok(Self {
            questions: self.questions[range].to_vec(),
        })
    }

    /// Shuffle question order. A seed makes the order reproducible; without
    /// one the generator is seeded from OS entropy. Answer order is preserved.
    pub fn shuffle(&mut self, seed: Option<u64>) {
        let mut rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        self.questions.shuffle(&mut rng);
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
