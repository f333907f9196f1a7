use clap::Subcommand;
use beatthebomb_core::{ScoreHistory, ScoreLog};
use serde_json::json;

#[derive(Subcommand)]
pub enum ScoresAction {
    /// List recorded games, oldest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Recent scores and totals
    History {
        /// How many recent games to show
        #[arg(long, default_value_t = 5)]
        recent: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ScoresAction) -> Result<(), Box<dyn std::error::Error>> {
    let log = ScoreLog::open()?;
    let entries = log.read_all()?;

    match action {
        ScoresAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("no games recorded");
            } else {
                for entry in &entries {
                    println!("{}  {}", entry.recorded_at.format("%Y-%m-%d %H:%M:%S"), entry.score);
                }
            }
        }
        ScoresAction::History { recent, json } => {
            let history = ScoreHistory::from_entries(&entries);
            if json {
                let summary = json!({
                    "games": history.len(),
                    "recent": history.recent(recent),
                    "best": history.best(),
                    "average": history.average(),
                    "edges": history.edges(),
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else if history.is_empty() {
                println!("no games recorded");
            } else {
                let recent: Vec<String> =
                    history.recent(recent).iter().map(u32::to_string).collect();
                println!("games:   {}", history.len());
                println!("recent:  {}", recent.join(" <- "));
                if let Some(best) = history.best() {
                    println!("best:    {best}");
                }
                if let Some(avg) = history.average() {
                    println!("average: {avg:.1}");
                }
            }
        }
    }
    Ok(())
}
