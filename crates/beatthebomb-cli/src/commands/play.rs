//! Interactive terminal front-end.
//!
//! Runs a fixed-rate frame loop on the main thread and feeds the engine the
//! measured wall-clock delta every frame. Stdin is read on a helper thread
//! and forwarded over a channel so the loop never blocks on input.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use clap::Args;
use beatthebomb_core::{
    Config, Event, Outcome, Question, ScoreHistory, ScoreLog, SessionEngine, SessionState,
};

use super::GameArgs;

const FRAME: Duration = Duration::from_micros(16_667);

#[derive(Args, Debug)]
pub struct PlayArgs {
    #[command(flatten)]
    game: GameArgs,
    /// Do not append the final score to the score log
    #[arg(long)]
    no_record: bool,
}

enum Command {
    Answer(usize),
    TogglePause,
    Reset,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "p" | "pause" => Command::TogglePause,
        "r" | "reset" | "y" | "again" => Command::Reset,
        "q" | "quit" | "n" => Command::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Answer(n - 1),
            _ => Command::Unknown(line.to_string()),
        },
    }
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let questions = args.game.question_set(&config)?;
    let mut engine = SessionEngine::new(args.game.rules(&config))?;
    let score_log = if args.no_record {
        None
    } else {
        Some(ScoreLog::open()?)
    };

    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let started = engine.load(questions)?;
    render_event(&engine, &started);
    println!("Answer with 1-4, 'p' to pause, 'r' to restart, 'q' to quit.");
    render_question(&engine);

    let mut last = Instant::now();
    let mut shown_secs = engine.remaining_secs().ceil() as u64;

    loop {
        match rx.recv_timeout(FRAME) {
            Ok(line) => match parse_command(&line) {
                Command::Answer(index) => match engine.submit_answer(index) {
                    Ok(Some(event)) => render_event(&engine, &event),
                    Ok(None) => {}
                    Err(e) => println!("{e}"),
                },
                Command::TogglePause => {
                    if let Some(event) = engine.set_paused(!engine.is_paused()) {
                        render_event(&engine, &event);
                    }
                }
                Command::Reset => {
                    engine.reset();
                    render_question(&engine);
                }
                Command::Quit => break,
                Command::Unknown(input) => println!("unrecognised input: {input}"),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f64();
        last = now;

        for event in engine.tick(delta) {
            render_event(&engine, &event);
            if let Event::GameOver { .. } = event {
                if let (Some(log), Some(final_score)) = (&score_log, engine.final_score()) {
                    log.append(final_score)?;
                    render_history(log)?;
                }
                println!("Play again? [y/n]");
            }
        }

        if engine.state() == SessionState::AwaitingAnswer && !engine.is_paused() {
            let secs = engine.remaining_secs().ceil() as u64;
            if secs != shown_secs {
                shown_secs = secs;
                print!("\r  fuse: {:>5.1}%  {:>2}s ", engine.remaining_percentage(), secs);
                std::io::stdout().flush()?;
            }
        }
    }

    Ok(())
}

fn render_question(engine: &SessionEngine) {
    let Some(question) = engine.current_question() else {
        return;
    };
    println!();
    println!(
        "Q{}: {}   (score {})",
        engine.question_index() + 1,
        question.prompt(),
        engine.score()
    );
    print_answers(question, None);
}

fn print_answers(question: &Question, reveal: Option<(usize, bool)>) {
    for (i, answer) in question.answers().iter().enumerate() {
        let mark = match reveal {
            Some((selected, correct)) if i == selected => {
                if correct {
                    "[+]"
                } else {
                    "[x]"
                }
            }
            Some((_, false)) if answer.correct => "[*]",
            _ => "[ ]",
        };
        println!("  {mark} {}. {}", i + 1, answer.text);
    }
}

fn render_event(engine: &SessionEngine, event: &Event) {
    match event {
        Event::SessionStarted {
            question_count,
            win_threshold,
            fuse_budget_secs,
            ..
        } => println!(
            "{question_count} questions, {fuse_budget_secs}s fuse each. Score {win_threshold} to defuse the bomb."
        ),
        Event::AnswerSubmitted {
            answer_index,
            correct,
            score,
            ..
        } => {
            println!();
            println!("{}  (score {score})", if *correct { "Correct!" } else { "Wrong!" });
            if let Some(question) = engine.questions().and_then(|q| q.get(engine.question_index())) {
                print_answers(question, Some((*answer_index, *correct)));
            }
        }
        Event::QuestionAdvanced { .. } | Event::SessionReset { .. } => render_question(engine),
        Event::Paused { remaining_pct, .. } => println!("\npaused at {remaining_pct:.1}% ('p' to resume)"),
        Event::Resumed { .. } => println!("resumed"),
        Event::FuseExpired { .. } => println!("\nThe fuse burned out!"),
        Event::BombExploded { .. } => println!("*** BOOM ***"),
        Event::GameOver { outcome, score, .. } => {
            let msg = match outcome {
                Outcome::Won => "You defused the bomb!",
                Outcome::Lost => "Boom! The bomb exploded!",
            };
            println!("{msg}  Final score: {score}");
        }
        Event::SessionUnloaded { .. } | Event::StateSnapshot { .. } => {}
    }
}

fn render_history(log: &ScoreLog) -> Result<(), Box<dyn std::error::Error>> {
    let history = ScoreHistory::from_entries(&log.read_all()?);
    let recent: Vec<String> = history.recent(5).iter().map(u32::to_string).collect();
    println!("Recent scores (newest first): {}", recent.join(", "));
    if let Some(best) = history.best() {
        println!("Best: {best} over {} games", history.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_answer_numbers_one_based() {
        assert!(matches!(parse_command("1"), Command::Answer(0)));
        assert!(matches!(parse_command(" 4 "), Command::Answer(3)));
        assert!(matches!(parse_command("0"), Command::Unknown(_)));
    }

    #[test]
    fn parses_control_keys() {
        assert!(matches!(parse_command("P"), Command::TogglePause));
        assert!(matches!(parse_command("y"), Command::Reset));
        assert!(matches!(parse_command("quit"), Command::Quit));
        assert!(matches!(parse_command("banana"), Command::Unknown(_)));
    }
}
