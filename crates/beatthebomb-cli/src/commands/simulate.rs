//! Scripted, deterministic sessions.
//!
//! Drives the engine with fixed 60 Hz frames instead of wall-clock time and
//! prints every emitted event as one JSON object per line.

use std::str::FromStr;

use clap::Args;
use beatthebomb_core::{Config, Event, ScoreLog, SessionEngine, SessionState};

use super::GameArgs;

const FRAME_SECS: f64 = 1.0 / 60.0;

/// One scripted move: answer with a 1-based choice, or let the fuse run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Answer(usize),
    Wait,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-" => Ok(Step::Wait),
            n => match n.parse::<usize>() {
                Ok(choice) if choice >= 1 => Ok(Step::Answer(choice - 1)),
                _ => Err(format!("invalid step '{s}': expected 1-4 or '-'")),
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    game: GameArgs,
    /// Comma-separated answers (1-based); '-' lets the fuse burn out
    #[arg(long, value_delimiter = ',', required = true)]
    answers: Vec<Step>,
    /// Seconds to think before each answer
    #[arg(long, default_value_t = 0.0)]
    delay: f64,
    /// Append the final score to the score log
    #[arg(long)]
    record: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let questions = args.game.question_set(&config)?;
    let mut engine = SessionEngine::new(args.game.rules(&config))?;

    let mut events = vec![engine.load(questions)?];
    play_script(&mut engine, &args.answers, args.delay, &mut events)?;
    events.push(engine.snapshot());

    for event in &events {
        println!("{}", serde_json::to_string(event)?);
    }

    if args.record {
        if let Some(final_score) = engine.final_score() {
            let entry = ScoreLog::open()?.append(final_score)?;
            tracing::info!(score = entry.score, "recorded simulated game");
        }
    }
    Ok(())
}

/// Feed the script to the engine. Stops early once the game is over.
pub fn play_script(
    engine: &mut SessionEngine,
    steps: &[Step],
    delay_secs: f64,
    events: &mut Vec<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    for step in steps {
        if !engine.state().is_active() {
            break;
        }
        match *step {
            Step::Answer(choice) => {
                let mut waited = 0.0;
                while waited < delay_secs && engine.state() == SessionState::AwaitingAnswer {
                    let dt = FRAME_SECS.min(delay_secs - waited);
                    events.extend(engine.tick(dt));
                    waited += dt;
                }
                if engine.state() == SessionState::AwaitingAnswer {
                    events.extend(engine.submit_answer(choice)?);
                }
            }
            Step::Wait => {
                while engine.state() == SessionState::AwaitingAnswer {
                    events.extend(engine.tick(FRAME_SECS));
                }
            }
        }
        while engine.state() == SessionState::ShowingFeedback {
            events.extend(engine.tick(FRAME_SECS));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatthebomb_core::quiz::{Answer, Question};
    use beatthebomb_core::{Outcome, QuestionSet, Rules};

    fn set(n: usize) -> QuestionSet {
        let questions = (0..n)
            .map(|i| {
                let answers = (0..4).map(|j| Answer::new(format!("{j}"), j == 0)).collect();
                Question::new(format!("q{i}"), answers).unwrap()
            })
            .collect();
        QuestionSet::new(questions).unwrap()
    }

    #[test]
    fn parses_steps() {
        assert_eq!("1".parse::<Step>(), Ok(Step::Answer(0)));
        assert_eq!(" - ".parse::<Step>(), Ok(Step::Wait));
        assert!("0".parse::<Step>().is_err());
        assert!("x".parse::<Step>().is_err());
    }

    #[test]
    fn waiting_burns_the_fuse_and_loses() {
        let mut engine = SessionEngine::new(Rules::classic()).unwrap();
        engine.load(set(3)).unwrap();
        let mut events = Vec::new();
        play_script(&mut engine, &[Step::Answer(0), Step::Wait, Step::Answer(0)], 0.0, &mut events)
            .unwrap();
        assert_eq!(engine.outcome(), Some(Outcome::Lost));
        assert_eq!(engine.score(), 10);
        assert!(events.iter().any(|e| matches!(e, Event::FuseExpired { question_index: 1, .. })));
        assert!(matches!(events.last(), Some(Event::GameOver { .. })));
    }

    #[test]
    fn penalty_run_all_correct_wins() {
        let mut engine = SessionEngine::new(Rules::penalty()).unwrap();
        engine.load(set(2)).unwrap();
        let mut events = Vec::new();
        play_script(&mut engine, &[Step::Answer(0), Step::Answer(0)], 2.0, &mut events).unwrap();
        assert_eq!(engine.outcome(), Some(Outcome::Won));
        assert_eq!(engine.score(), 20);
    }
}
