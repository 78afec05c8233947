//! Deckhand - a client for a spaced-repetition flashcard service.
//!
//! This library contains the orchestration core of a flashcard client:
//! a typed HTTP gateway with a precise error taxonomy, per-resource API
//! facades, an optimistic collection store with rollback, a review-session
//! state machine, and a synthetic progress ticker for long-running uploads.
//!
//! Rendering, navigation, and credential storage are the caller's concern;
//! the library exposes state and results, never screens.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use deckhand::{ApiClient, MemoryTokenStore, StackClient, ReviewSession};
//! use deckhand::http::ReqwestTransport;
//!
//! let transport = Arc::new(ReqwestTransport::new(reqwest::Client::new()));
//! let api = ApiClient::new("https://api.example.com", transport);
//! let tokens = Arc::new(MemoryTokenStore::with_token("..."));
//!
//! let stacks = StackClient::new(api.clone(), tokens);
//! let mut session = ReviewSession::new(stacks, "stack-uid");
//! session.load_next().await;
//! ```

pub mod auth;
pub mod cards;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod models;
pub mod multipart;
pub mod progress;
pub mod session;
pub mod stacks;
pub mod store;
pub mod token;

pub use auth::AuthClient;
pub use cards::CardClient;
pub use client::ApiClient;
pub use endpoint::Endpoint;
pub use error::ApiError;
pub use models::{AuthResponse, Card, CardMaturity, Difficulty, RatingOption, Stack};
pub use progress::{ProgressScript, ProgressTicker};
pub use session::{ReviewSession, SessionState};
pub use stacks::{StackClient, UploadError, MAX_UPLOAD_BYTES};
pub use store::{CollectionStore, Keyed};
pub use token::{MemoryTokenStore, TokenStore};
