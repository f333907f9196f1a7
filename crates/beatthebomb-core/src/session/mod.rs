mod engine;

pub use engine::{
    Feedback, FinalScore, GameOverReason, Outcome, SessionEngine, SessionState,
};
