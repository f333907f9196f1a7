//! Fuse timer implementation.
//!
//! The fuse is a delta-accumulating countdown. It does not read the clock
//! itself - the caller feeds it the wall-clock delta of each frame through
//! `tick()`.
//!
//! ## Time accounting
//!
//! Every delta passed to `tick()` lands in exactly one bucket:
//!
//! ```text
//! running -> elapsed_secs
//! paused  -> current pause interval -> pause_accumulator_secs (on resume)
//! ```
//!
//! Penalties and bonuses move `elapsed_secs` directly and are clamped to
//! `[0, budget]`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut fuse = FuseTimer::new(20.0)?;
//! // Once per frame:
//! fuse.tick(delta_secs);
//! let pct = fuse.remaining_percentage();
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Countdown against a fixed time budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuseTimer {
    budget_secs: f64,
    elapsed_secs: f64,
    /// Closed pause intervals, in seconds.
    pause_accumulator_secs: f64,
    /// Open pause interval; `Some` while paused.
    #[serde(default)]
    pause_marker_secs: Option<f64>,
}

impl FuseTimer {
    /// Create a fuse with the given budget, unpaused and with nothing elapsed.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidBudget`] if the budget is not a
    /// positive, finite number of seconds.
    pub fn new(budget_secs: f64) -> Result<Self, SessionError> {
        validate_budget(budget_secs)?;
        Ok(Self {
            budget_secs,
            elapsed_secs: 0.0,
            pause_accumulator_secs: 0.0,
            pause_marker_secs: None,
        })
    }

    /// Reinitialize in place with a new budget.
    ///
    /// # Errors
    /// Same as [`FuseTimer::new`]; the timer is left untouched on error.
    pub fn init(&mut self, budget_secs: f64) -> Result<(), SessionError> {
        *self = Self::new(budget_secs)?;
        Ok(())
    }

    /// Restart with the current budget.
    pub fn restart(&mut self) {
        self.elapsed_secs = 0.0;
        self.pause_accumulator_secs = 0.0;
        self.pause_marker_secs = None;
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn budget_secs(&self) -> f64 {
        self.budget_secs
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn is_paused(&self) -> bool {
        self.pause_marker_secs.is_some()
    }

    /// Total paused time, including the currently open interval.
    pub fn paused_secs(&self) -> f64 {
        self.pause_accumulator_secs + self.pause_marker_secs.unwrap_or(0.0)
    }

    pub fn remaining_secs(&self) -> f64 {
        (self.budget_secs - self.elapsed_secs).max(0.0)
    }

    /// 0.0 ..= 100.0 of the budget still left.
    pub fn remaining_percentage(&self) -> f64 {
        (100.0 * (1.0 - self.elapsed_secs / self.budget_secs)).clamp(0.0, 100.0)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_percentage() <= 0.0
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance by one frame's wall-clock delta.
    ///
    /// While paused the delta is recorded as paused time and the fuse does
    /// not burn. Negative or non-finite deltas count as zero.
    pub fn tick(&mut self, delta_secs: f64) {
        let delta = sanitize_secs(delta_secs);
        match self.pause_marker_secs.as_mut() {
            Some(open) => *open += delta,
            None => self.elapsed_secs = (self.elapsed_secs + delta).min(self.budget_secs),
        }
    }

    /// Burn `secs` of fuse at once. Remaining time floors at zero.
    pub fn apply_penalty(&mut self, secs: f64) {
        self.elapsed_secs = (self.elapsed_secs + sanitize_secs(secs)).min(self.budget_secs);
    }

    /// Give back `secs` of fuse. Remaining time caps at the full budget.
    pub fn apply_bonus(&mut self, secs: f64) {
        self.elapsed_secs = (self.elapsed_secs - sanitize_secs(secs)).max(0.0);
    }

    /// Pause or resume. Repeating the current state is a no-op.
    ///
    /// Returns `true` if the state changed.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        match (paused, self.pause_marker_secs) {
            (true, None) => {
                self.pause_marker_secs = Some(0.0);
                true
            }
            (false, Some(open)) => {
                self.pause_accumulator_secs += open;
                self.pause_marker_secs = None;
                true
            }
            _ => false,
        }
    }
}

fn validate_budget(budget_secs: f64) -> Result<(), SessionError> {
    if budget_secs.is_finite() && budget_secs > 0.0 {
        Ok(())
    } else {
        Err(SessionError::InvalidBudget(budget_secs))
    }
}

/// Clamp a caller-supplied duration to a finite, non-negative value.
pub(crate) fn sanitize_secs(secs: f64) -> f64 {
    if secs.is_finite() {
        secs.max(0.0)
    } else {
        0.0
    }
}
