pub mod catalog;
pub mod config;
pub mod play;
pub mod questions;
pub mod scores;
pub mod simulate;

use std::path::PathBuf;

use clap::Args;
use beatthebomb_core::{Catalog, Config, QuestionSet, Rules, Variant};

/// Question and rule selection shared by `play` and `simulate`.
#[derive(Args, Debug, Clone)]
pub struct GameArgs {
    /// Question set JSON file (defaults to game.questions_path)
    #[arg(long)]
    pub questions: Option<PathBuf>,
    /// Catalog JSON file (defaults to game.catalog_path)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Category path inside the catalog, e.g. "Science/Physics"
    #[arg(long)]
    pub category: Option<String>,
    /// Game variant: classic or penalty (defaults to game.variant)
    #[arg(long)]
    pub variant: Option<Variant>,
    /// Shuffle question order
    #[arg(long)]
    pub shuffle: bool,
    /// Seed for --shuffle; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,
}

impl GameArgs {
    pub fn rules(&self, config: &Config) -> Rules {
        config.rules(self.variant.unwrap_or(config.game.variant))
    }

    /// Load the question bank, narrow it to the chosen category and
    /// optionally shuffle it.
    pub fn question_set(&self, config: &Config) -> Result<QuestionSet, Box<dyn std::error::Error>> {
        let path = self
            .questions
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.game.questions_path));
        let bank = QuestionSet::load(&path)?;

        let mut set = match &self.category {
            Some(category) => {
                let catalog_path = self
                    .catalog
                    .clone()
                    .or_else(|| {
                        (!config.game.catalog_path.is_empty())
                            .then(|| PathBuf::from(&config.game.catalog_path))
                    })
                    .ok_or("--category needs a catalog (--catalog or game.catalog_path)")?;
                let catalog = Catalog::load(&catalog_path)?;
                let parts: Vec<&str> = category.split('/').map(str::trim).collect();
                catalog.resolve(&parts, &bank)?
            }
            None => bank,
        };

        if self.shuffle || config.game.shuffle_questions {
            tracing::debug!(seed = ?self.seed, "shuffling questions");
            set.shuffle(self.seed);
        }
        Ok(set)
    }
}
