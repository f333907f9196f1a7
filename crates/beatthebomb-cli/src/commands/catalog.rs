use std::path::PathBuf;

use clap::Subcommand;
use beatthebomb_core::{Catalog, QuestionSet};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List playable categories
    List {
        /// Catalog JSON file
        path: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the questions a category selects
    Resolve {
        /// Catalog JSON file
        path: PathBuf,
        /// Category path, e.g. "Science/Physics"
        category: String,
        /// Question bank JSON file
        #[arg(long)]
        questions: PathBuf,
    },
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CatalogAction::List { path, json } => {
            let catalog = Catalog::load(&path)?;
            let entries = catalog.entries();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    println!(
                        "{}\t{}..{}",
                        entry.path.join("/"),
                        entry.questions.start,
                        entry.questions.end
                    );
                }
            }
        }
        CatalogAction::Resolve {
            path,
            category,
            questions,
        } => {
            let catalog = Catalog::load(&path)?;
            let bank = QuestionSet::load(&questions)?;
            let parts: Vec<&str> = category.split('/').map(str::trim).collect();
            let set = catalog.resolve(&parts, &bank)?;
            for (i, question) in set.iter().enumerate() {
                println!("{}. {}", i + 1, question.prompt());
            }
        }
    }
    Ok(())
}
