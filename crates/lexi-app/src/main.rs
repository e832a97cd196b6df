use std::sync::Arc;

use clap::{Parser, Subcommand};

mod commands;
mod profile;
mod state;

#[cfg(test)]
mod tests;

use self::state::AppState;

#[derive(Parser)]
#[command(name = "lexi", about = "Dictionary-backed vocabulary learning from the terminal")]
struct Cli {
    /// Config profile name
    #[arg(long, default_value = "main")]
    profile: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the dictionary: priority chunks first, the rest in the background
    Load,
    /// Analyze text from the argument or stdin and report difficult words
    Analyze {
        text: Option<String>,
        /// Difficulty threshold: common/beginner/intermediate/advanced/expert
        #[arg(long)]
        level: Option<String>,
        /// Highlight mode: unknown/difficult/all
        #[arg(long)]
        mode: Option<String>,
    },
    /// Manage the learning/mastered word lists
    Vocab {
        #[command(subcommand)]
        action: VocabAction,
    },
    /// Two-way vocabulary sync with the configured drive
    Sync,
}

#[derive(Subcommand)]
enum VocabAction {
    /// Add a word to the learning list
    Add { word: String },
    /// Mark a word as mastered
    Master { word: String },
    /// Remove a word from both lists
    Remove { word: String },
    /// Show both lists
    List,
    /// Delete every vocabulary entry
    Clear,
    /// Write the vocabulary to a JSON file
    Export { path: String },
    /// Replace the vocabulary from a JSON file
    Import { path: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    profile::init_user_config()?;
    let config = profile::load_user_profile(&cli.profile)?;
    let state = Arc::new(AppState::new(config));

    match cli.command {
        Command::Load => commands::load::run(state).await,
        Command::Analyze { text, level, mode } => {
            commands::analyze::run(state, text, level, mode).await
        }
        Command::Vocab { action } => commands::vocab::run(state, action).await,
        Command::Sync => commands::sync::run(state).await,
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if atty::is(atty::Stream::Stderr) {
        builder.init();
    } else {
        builder.with_ansi(false).init();
    }
}
