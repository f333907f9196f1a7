use std::path::PathBuf;

use clap::Subcommand;
use beatthebomb_core::{Catalog, QuestionSet};

#[derive(Subcommand)]
pub enum QuestionsAction {
    /// Check a question set file, and optionally a catalog against it
    Validate {
        /// Question set JSON file
        path: PathBuf,
        /// Catalog whose ranges must fit inside the set
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Print one question, or the whole set, as JSON
    Show {
        /// Question set JSON file
        path: PathBuf,
        /// 1-based question number
        #[arg(long)]
        number: Option<usize>,
    },
}

pub fn run(action: QuestionsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        QuestionsAction::Validate { path, catalog } => {
            let set = QuestionSet::load(&path)?;
            println!("ok: {} questions", set.len());
            if let Some(catalog_path) = catalog {
                let catalog = Catalog::load(&catalog_path)?;
                catalog.validate_against(&set)?;
                println!("ok: {} categories", catalog.entries().len());
            }
        }
        QuestionsAction::Show { path, number } => {
            let set = QuestionSet::load(&path)?;
            match number {
                Some(n) => {
                    let question = n
                        .checked_sub(1)
                        .and_then(|i| set.get(i))
                        .ok_or_else(|| format!("no question {n}: set has {}", set.len()))?;
                    println!("{}", serde_json::to_string_pretty(question)?);
                }
                None => println!("{}", serde_json::to_string_pretty(&set)?),
            }
        }
    }
    Ok(())
}
