use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "beatthebomb-cli", version, about = "Beat the Bomb CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively in the terminal
    Play(commands::play::PlayArgs),
    /// Run a scripted session and print its events as JSON
    Simulate(commands::simulate::SimulateArgs),
    /// Question set tools
    Questions {
        #[command(subcommand)]
        action: commands::questions::QuestionsAction,
    },
    /// Category catalog tools
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Score history
    Scores {
        #[command(subcommand)]
        action: commands::scores::ScoresAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

/// Logs go to stderr; `BEATTHEBOMB_LOG` overrides the default `warn` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_env("BEATTHEBOMB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Questions { action } => commands::questions::run(action),
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Scores { action } => commands::scores::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "beatthebomb-cli",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
