//! Command handlers: thin glue between the CLI surface and the library.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use deckhand::http::ReqwestTransport;
use deckhand::{
    ApiClient, ApiError, AuthClient, Card, CardClient, CollectionStore, MemoryTokenStore,
    ProgressScript, ProgressTicker, ReviewSession, SessionState, Stack, StackClient, UploadError,
};

use crate::config::Config;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn api_client(config: &Config) -> Result<ApiClient, Box<dyn Error>> {
    let transport =
        ReqwestTransport::with_timeout(REQUEST_TIMEOUT).map_err(|e| format!("{e}"))?;
    Ok(ApiClient::new(config.api_url(), Arc::new(transport)))
}

fn token_store(config: &Config) -> Arc<MemoryTokenStore> {
    Arc::new(match config.token() {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    })
}

fn stack_client(config: &Config) -> Result<StackClient, Box<dyn Error>> {
    Ok(StackClient::new(api_client(config)?, token_store(config)))
}

fn card_client(config: &Config) -> Result<CardClient, Box<dyn Error>> {
    Ok(CardClient::new(api_client(config)?, token_store(config)))
}

/// Turn a gateway error into something fit for the terminal.
fn friendly(err: ApiError) -> Box<dyn Error> {
    if err.requires_reauth() {
        return "Not logged in. Run `deckhand login` first.".into();
    }
    tracing::debug!(%err, "api call failed");
    err.user_message().into()
}

// ---------- auth ----------

pub async fn login(config: &Config, email: &str) -> Result<(), Box<dyn Error>> {
    let term = Term::stdout();
    term.write_str("Password: ")?;
    let password = term.read_secure_line()?;

    let auth = AuthClient::new(api_client(config)?);
    let response = auth.login(email, &password).await.map_err(friendly)?;

    let path = Config::save_credentials(&response.token, &response.username)?;
    println!(
        "Logged in as {}. Credential saved to {}.",
        style(&response.username).bold(),
        path.display()
    );
    Ok(())
}

pub async fn signup(config: &Config, name: &str, email: &str) -> Result<(), Box<dyn Error>> {
    let term = Term::stdout();
    term.write_str("Password: ")?;
    let password = term.read_secure_line()?;

    let auth = AuthClient::new(api_client(config)?);
    let response = auth.signup(name, email, &password).await.map_err(friendly)?;

    let path = Config::save_credentials(&response.token, &response.username)?;
    println!(
        "Welcome, {}! Credential saved to {}.",
        style(&response.username).bold(),
        path.display()
    );
    Ok(())
}

pub fn logout() -> Result<(), Box<dyn Error>> {
    Config::clear_credentials()?;
    println!("Logged out.");
    Ok(())
}

// ---------- stacks ----------

pub async fn list_stacks(config: &Config) -> Result<(), Box<dyn Error>> {
    let stacks = stack_client(config)?.list_stacks().await.map_err(friendly)?;

    if stacks.is_empty() {
        println!("No stacks yet. Create one with `deckhand stacks create <name>`.");
        return Ok(());
    }
    for stack in &stacks {
        println!(
            "{}  {}  ({} cards)",
            style(&stack.unique_id).dim(),
            style(&stack.name).bold(),
            stack.cards.len()
        );
    }
    Ok(())
}

pub async fn create_stack(config: &Config, name: &str, color: &str) -> Result<(), Box<dyn Error>> {
    let stack = stack_client(config)?
        .create_stack(name, color)
        .await
        .map_err(friendly)?;
    println!("Created stack {} ({}).", style(&stack.name).bold(), stack.unique_id);
    Ok(())
}

pub async fn show_stack(config: &Config, stack_id: &str) -> Result<(), Box<dyn Error>> {
    let stack = stack_client(config)?
        .fetch_stack(stack_id)
        .await
        .map_err(friendly)?;

    println!("{} ({} cards)", style(&stack.name).bold(), stack.cards.len());
    for card in &stack.cards {
        let due = card
            .maturity
            .as_ref()
            .and_then(|m| m.due_date())
            .map(|d| format!("  due {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!("{}  {}{}", style(&card.unique_id).dim(), card.question, due);
    }
    Ok(())
}

/// Delete a stack through the optimistic store: the entry leaves the local
/// list immediately and is restored in place if the server refuses.
pub async fn delete_stack(config: &Config, stack_id: &str) -> Result<(), Box<dyn Error>> {
    let client = stack_client(config)?;
    let mut store: CollectionStore<Stack> =
        CollectionStore::new(client.list_stacks().await.map_err(friendly)?);

    if store.get(stack_id).is_none() {
        return Err(format!("no stack with id {stack_id}").into());
    }

    match store
        .remove(stack_id, || client.delete_stack(stack_id))
        .await
    {
        Ok(()) => {
            println!("Deleted. {} stacks remain.", store.len());
            Ok(())
        }
        Err(err) => {
            println!("Delete failed, stack restored locally.");
            Err(friendly(err))
        }
    }
}

// ---------- cards ----------

pub async fn add_card(
    config: &Config,
    stack_id: &str,
    question: &str,
    answer: &str,
) -> Result<(), Box<dyn Error>> {
    let card = card_client(config)?
        .create_card(stack_id, question, answer)
        .await
        .map_err(friendly)?;
    println!("Created card {}.", card.unique_id);
    Ok(())
}

pub async fn edit_card(
    config: &Config,
    stack_id: &str,
    card_id: &str,
    question: &str,
    answer: &str,
) -> Result<(), Box<dyn Error>> {
    let client = stack_client(config)?;
    let stack = client.fetch_stack(stack_id).await.map_err(friendly)?;
    let mut store: CollectionStore<Card> = CollectionStore::new(stack.cards);

    let edited = card_client(config)?
        .update_card(stack_id, card_id, question, answer)
        .await
        .map_err(friendly)?;
    if store.replace(edited) {
        println!("Updated card {card_id}.");
    } else {
        println!("Card {card_id} was edited but is no longer in the stack.");
    }
    Ok(())
}

/// Delete a card optimistically, sending the snapshot the service expects.
pub async fn delete_card(
    config: &Config,
    stack_id: &str,
    card_id: &str,
) -> Result<(), Box<dyn Error>> {
    let stacks = stack_client(config)?;
    let cards = card_client(config)?;

    let stack = stacks.fetch_stack(stack_id).await.map_err(friendly)?;
    let mut store: CollectionStore<Card> = CollectionStore::new(stack.cards);

    let Some(card) = store.get(card_id).cloned() else {
        return Err(format!("no card with id {card_id} in stack {stack_id}").into());
    };

    match store
        .remove(card_id, || {
            cards.delete_card(stack_id, card_id, &card.question, &card.answer)
        })
        .await
    {
        Ok(()) => {
            println!("Deleted. {} cards remain.", store.len());
            Ok(())
        }
        Err(err) => {
            println!("Delete failed, card restored locally.");
            Err(friendly(err))
        }
    }
}

// ---------- review ----------

/// Run one interactive review session to completion or abandonment.
pub async fn review(config: &Config, stack_id: &str) -> Result<(), Box<dyn Error>> {
    let term = Term::stdout();
    let mut session = ReviewSession::new(stack_client(config)?, stack_id);
    session.load_next().await;

    loop {
        match session.state().clone() {
            SessionState::Loading => {
                // load_next always settles into another state before
                // returning; nothing to render here.
            }
            SessionState::ShowingQuestion(card) => {
                println!();
                println!("{}", style(&card.question).bold());
                if let Some(hint) = &card.hint {
                    println!("{}", style(format!("hint: {hint}")).dim());
                }
                term.write_str("[Enter] to reveal the answer ")?;
                term.read_line()?;
                session.reveal();
            }
            SessionState::ShowingAnswer(card) => {
                println!("{}", card.answer);

                let options = card.rating_options.clone().unwrap_or_default();
                for (i, option) in options.iter().enumerate() {
                    println!(
                        "  {}. {} ({})",
                        i + 1,
                        option.difficulty.name,
                        option.duration.display_label
                    );
                }
                term.write_str("How did it go? ")?;
                let choice = term.read_line()?;
                let Some(option) = choice
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| options.get(i))
                else {
                    println!("Pick a number between 1 and {}.", options.len());
                    continue;
                };
                session.rate(option.difficulty_id()).await;
            }
            SessionState::Submitting(_) => {
                // rate() resolves this state before returning.
            }
            SessionState::Completed => {
                println!();
                println!(
                    "All done! {} cards reviewed.",
                    style(session.cards_reviewed()).bold()
                );
                term.write_str("Learn ahead one day? [y/N] ")?;
                if term.read_line()?.trim().eq_ignore_ascii_case("y") {
                    session.learn_ahead().await;
                } else {
                    return Ok(());
                }
            }
            SessionState::Error(message) => {
                println!("{}", style(&message).red());
                term.write_str("Retry? [y/N] ")?;
                if term.read_line()?.trim().eq_ignore_ascii_case("y") {
                    session.retry().await;
                } else {
                    return Ok(());
                }
            }
        }
    }
}

// ---------- generation upload ----------

/// Upload a document and show the scripted progress while the server
/// generates cards. The ticker is torn down by RAII however the upload
/// settles.
pub async fn generate(
    config: &Config,
    stack_id: &str,
    file: &Path,
    instructions: &str,
) -> Result<(), Box<dyn Error>> {
    let bytes = std::fs::read(file)?;
    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf");

    let client = stack_client(config)?;

    let ticker = ProgressTicker::start(ProgressScript::for_upload(), Duration::from_secs(1));
    let mut messages = ticker.subscribe();

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(ticker.message());

    let upload = client.generate_from_file(stack_id, &bytes, filename, instructions);
    tokio::pin!(upload);

    let result = loop {
        tokio::select! {
            result = &mut upload => break result,
            changed = messages.changed() => {
                if changed.is_ok() {
                    spinner.set_message(messages.borrow().clone());
                }
            }
        }
    };
    drop(ticker);
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            println!("Cards generated. Check the stack with `deckhand stacks show {stack_id}`.");
            Ok(())
        }
        Err(UploadError::FileTooLarge { size, max }) => {
            Err(format!("{} is {size} bytes, over the {max} byte limit.", file.display()).into())
        }
        Err(UploadError::Api(err)) => Err(friendly(err)),
    }
}
