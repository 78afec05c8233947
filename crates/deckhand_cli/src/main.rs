//! Deckhand CLI - terminal client for the flashcard service.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deckhand")]
#[command(version)]
#[command(about = "Spaced-repetition flashcards from the terminal")]
#[command(
    long_about = "Deckhand talks to the flashcard service: manage stacks and cards, \
run review sessions against the scheduler, and generate cards from uploaded documents."
)]
#[command(after_long_help = r#"EXAMPLES
    Log in and list your stacks:
        $ deckhand login me@example.com
        $ deckhand stacks list

    Review the cards due in a stack:
        $ deckhand review 4f1c9a

    Generate cards from a PDF:
        $ deckhand generate 4f1c9a notes.pdf --instructions "focus on definitions"

CONFIGURATION
    Deckhand reads configuration from:
      1. ~/.config/deckhand/config.toml (or $XDG_CONFIG_HOME/deckhand/config.toml)
      2. ./deckhand.toml in the current directory
      3. Environment variables (DECKHAND_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    DECKHAND_API_URL     Service base URL
    DECKHAND_AUTH_TOKEN  Bearer token (normally written by `deckhand login`)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        /// Account email address
        email: String,
    },
    /// Create an account and store the session token
    Signup {
        /// Display name
        name: String,
        /// Account email address
        email: String,
    },
    /// Forget the stored session token
    Logout,
    /// Stack operations
    Stacks {
        #[command(subcommand)]
        action: StacksAction,
    },
    /// Card operations
    Cards {
        #[command(subcommand)]
        action: CardsAction,
    },
    /// Run an interactive review session for a stack
    Review {
        /// Stack id
        stack: String,
    },
    /// Generate cards from an uploaded document
    Generate {
        /// Stack id to add the generated cards to
        stack: String,
        /// Document to upload (10 MB max)
        file: PathBuf,
        /// Extra guidance for the generator
        #[arg(short, long, default_value = "")]
        instructions: String,
    },
}

#[derive(Subcommand)]
enum StacksAction {
    /// List all stacks
    List,
    /// Create a stack
    Create {
        /// Stack name
        name: String,
        /// Hex color, e.g. #059669
        #[arg(short, long, default_value = "#059669")]
        color: String,
    },
    /// Show a stack and its cards
    Show {
        /// Stack id
        stack: String,
    },
    /// Delete a stack
    Delete {
        /// Stack id
        stack: String,
    },
}

#[derive(Subcommand)]
enum CardsAction {
    /// Add a card to a stack
    Add {
        /// Stack id
        stack: String,
        /// Question text
        question: String,
        /// Answer text
        answer: String,
    },
    /// Edit an existing card
    Edit {
        /// Stack id
        stack: String,
        /// Card id
        card: String,
        /// New question text
        question: String,
        /// New answer text
        answer: String,
    },
    /// Delete a card
    Delete {
        /// Stack id
        stack: String,
        /// Card id
        card: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing for non-TTY mode (structured logging)
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("deckhand=info,deckhand_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config = config::Config::load();
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { email } => commands::login(&config, &email).await,
        Commands::Signup { name, email } => commands::signup(&config, &name, &email).await,
        Commands::Logout => commands::logout(),
        Commands::Stacks { action } => match action {
            StacksAction::List => commands::list_stacks(&config).await,
            StacksAction::Create { name, color } => {
                commands::create_stack(&config, &name, &color).await
            }
            StacksAction::Show { stack } => commands::show_stack(&config, &stack).await,
            StacksAction::Delete { stack } => commands::delete_stack(&config, &stack).await,
        },
        Commands::Cards { action } => match action {
            CardsAction::Add {
                stack,
                question,
                answer,
            } => commands::add_card(&config, &stack, &question, &answer).await,
            CardsAction::Edit {
                stack,
                card,
                question,
                answer,
            } => commands::edit_card(&config, &stack, &card, &question, &answer).await,
            CardsAction::Delete { stack, card } => {
                commands::delete_card(&config, &stack, &card).await
            }
        },
        Commands::Review { stack } => commands::review(&config, &stack).await,
        Commands::Generate {
            stack,
            file,
            instructions,
        } => commands::generate(&config, &stack, &file, &instructions).await,
    }
}
