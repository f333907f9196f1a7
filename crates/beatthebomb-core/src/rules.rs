//! Game variants and their tunable rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two shipped game variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// No time penalty; defuse with a flat score.
    #[default]
    Classic,
    /// Wrong answers burn fuse; defuse with half of the possible points.
    Penalty,
}

impl Variant {
    pub fn rules(self) -> Rules {
        match self {
            Variant::Classic => Rules::classic(),
            Variant::Penalty => Rules::penalty(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Penalty => "penalty",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Variant::Classic),
            "penalty" => Ok(Variant::Penalty),
            other => Err(format!("unknown variant '{other}' (expected classic or penalty)")),
        }
    }
}

/// Minimum score needed to defuse the bomb.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WinThreshold {
    /// Fixed number of points.
    Flat { points: u32 },
    /// Fraction of the maximum score for the loaded set.
    Proportional { ratio: f64 },
}

impl WinThreshold {
    /// Resolve to points for a set of `question_count` questions.
    pub fn points_for(&self, question_count: usize, points_per_correct: u32) -> u32 {
        match *self {
            WinThreshold::Flat { points } => points,
            WinThreshold::Proportional { ratio } => {
                let max = question_count as f64 * f64::from(points_per_correct);
                (max * ratio.clamp(0.0, 1.0)).ceil() as u32
            }
        }
    }
}

/// Tunables for one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Fuse length per question.
    #[serde(default = "default_fuse_budget")]
    pub fuse_budget_secs: f64,
    /// Fuse burned by a wrong answer.
    #[serde(default)]
    pub wrong_answer_penalty_secs: f64,
    /// Fuse given back by a correct answer.
    #[serde(default)]
    pub correct_answer_bonus_secs: f64,
    /// How long the answer feedback stays up before advancing.
    #[serde(default = "default_feedback")]
    pub feedback_secs: f64,
    #[serde(default = "default_points")]
    pub points_per_correct: u32,
    pub win_threshold: WinThreshold,
}

fn default_fuse_budget() -> f64 {
    20.0
}
fn default_feedback() -> f64 {
    1.0
}
fn default_points() -> u32 {
    10
}

impl Rules {
    pub fn classic() -> Self {
        Self {
            fuse_budget_secs: default_fuse_budget(),
            wrong_answer_penalty_secs: 0.0,
            correct_answer_bonus_secs: 0.0,
            feedback_secs: default_feedback(),
            points_per_correct: default_points(),
            win_threshold: WinThreshold::Flat { points: 300 },
        }
    }

    pub fn penalty() -> Self {
        Self {
            wrong_answer_penalty_secs: 3.0,
            win_threshold: WinThreshold::Proportional { ratio: 0.5 },
            ..Self::classic()
        }
    }

    pub fn win_threshold_for(&self, question_count: usize) -> u32 {
        self.win_threshold
            .points_for(question_count, self.points_per_correct)
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::classic()
    }
}
