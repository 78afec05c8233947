//! The review-session state machine.
//!
//! One session drives the spaced-repetition loop for one stack: fetch the
//! next due card, reveal its answer, submit a rating, advance. The
//! scheduling algorithm itself is server-owned; the session only walks the
//! transition table below.
//!
//! ```text
//! Loading ──fetch Some──▶ ShowingQuestion ──reveal──▶ ShowingAnswer
//!    │                                                     │
//!    ├─fetch None──▶ Completed ──learn_ahead──▶ Loading    │ rate
//!    └─fetch Err───▶ Error ──retry──▶ Loading              ▼
//!                      ▲                              Submitting
//!                      └──submit Err──────────────────────┘ submit Ok: back to Loading
//! ```
//!
//! All mutation goes through `&mut self`: one writer per session, and every
//! observer sees the states in exactly this order, never skipped or
//! reordered.

use crate::models::Card;
use crate::stacks::StackClient;

/// Fixed user-facing messages for the two failure families of a session.
pub mod messages {
    pub const LOAD_FAILED: &str = "The next card could not be loaded.";
    pub const RATING_FAILED: &str = "Your rating could not be submitted.";
}

/// Where a review session currently stands.
///
/// Equality compares cards by `unique_id` only. That is all a differ needs
/// to decide whether a transition shows "the same card" or "a new card";
/// card content is never compared.
#[derive(Debug, Clone)]
pub enum SessionState {
    Loading,
    ShowingQuestion(Card),
    ShowingAnswer(Card),
    Submitting(Card),
    Completed,
    Error(String),
}

impl PartialEq for SessionState {
    fn eq(&self, other: &Self) -> bool {
        use SessionState::*;
        match (self, other) {
            (Loading, Loading) | (Completed, Completed) => true,
            (ShowingQuestion(a), ShowingQuestion(b))
            | (ShowingAnswer(a), ShowingAnswer(b))
            | (Submitting(a), Submitting(b)) => a.unique_id == b.unique_id,
            (Error(a), Error(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for SessionState {}

/// One continuous review run against a single stack.
pub struct ReviewSession {
    stacks: StackClient,
    stack_id: String,
    state: SessionState,
    cards_reviewed: u32,
    days_ahead: u32,
}

impl ReviewSession {
    /// Start a session. The state begins at `Loading`; call
    /// [`ReviewSession::load_next`] to fetch the first card.
    pub fn new(stacks: StackClient, stack_id: impl Into<String>) -> Self {
        Self {
            stacks,
            stack_id: stack_id.into(),
            state: SessionState::Loading,
            cards_reviewed: 0,
            days_ahead: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// How many ratings have been accepted this session.
    #[must_use]
    pub fn cards_reviewed(&self) -> u32 {
        self.cards_reviewed
    }

    /// Current widening of the due-date window.
    #[must_use]
    pub fn days_ahead(&self) -> u32 {
        self.days_ahead
    }

    /// The card on screen, if any state is holding one.
    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        match &self.state {
            SessionState::ShowingQuestion(card)
            | SessionState::ShowingAnswer(card)
            | SessionState::Submitting(card) => Some(card),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_showing_answer(&self) -> bool {
        matches!(self.state, SessionState::ShowingAnswer(_))
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SessionState::Submitting(_))
    }

    /// Fetch the next due card within the current look-ahead window.
    ///
    /// No card due means the session completes; a fetch failure parks the
    /// session in `Error` until [`ReviewSession::retry`].
    pub async fn load_next(&mut self) {
        self.transition(SessionState::Loading);

        match self
            .stacks
            .fetch_next_card(&self.stack_id, self.days_ahead)
            .await
        {
            Ok(Some(card)) => self.transition(SessionState::ShowingQuestion(card)),
            Ok(None) => self.transition(SessionState::Completed),
            Err(err) => {
                tracing::warn!(stack_id = %self.stack_id, %err, "next card fetch failed");
                self.transition(SessionState::Error(messages::LOAD_FAILED.to_string()));
            }
        }
    }

    /// Reveal the answer of the current question.
    ///
    /// One-directional: a revealed card cannot be re-hidden. A card served
    /// without rating options is not reviewable and never reaches this
    /// transition; anything but `ShowingQuestion` is a no-op.
    pub fn reveal(&mut self) {
        let SessionState::ShowingQuestion(card) = &self.state else {
            return;
        };
        if !card.is_reviewable() {
            tracing::warn!(card_id = %card.unique_id, "card has no rating options, not revealing");
            return;
        }
        let card = card.clone();
        self.transition(SessionState::ShowingAnswer(card));
    }

    /// Submit a difficulty rating for the revealed card.
    ///
    /// Only legal from `ShowingAnswer`; the mandatory reveal step is what
    /// keeps a question from being rated unseen. On success the reviewed
    /// count grows by one and the next card is fetched with the same
    /// look-ahead; on failure the count is untouched and the session parks
    /// in `Error`.
    pub async fn rate(&mut self, difficulty_id: i64) {
        let SessionState::ShowingAnswer(card) = &self.state else {
            return;
        };
        let card = card.clone();
        self.transition(SessionState::Submitting(card.clone()));

        match self
            .stacks
            .submit_rating(&self.stack_id, &card.unique_id, difficulty_id)
            .await
        {
            Ok(()) => {
                self.cards_reviewed += 1;
                self.load_next().await;
            }
            Err(err) => {
                tracing::warn!(card_id = %card.unique_id, %err, "rating submit failed");
                self.transition(SessionState::Error(messages::RATING_FAILED.to_string()));
            }
        }
    }

    /// Widen the due-date window by one day and fetch again, pulling
    /// forward cards that are not yet due.
    pub async fn learn_ahead(&mut self) {
        self.days_ahead += 1;
        self.load_next().await;
    }

    /// Leave the `Error` state by fetching again. Session counters are
    /// untouched.
    pub async fn retry(&mut self) {
        self.load_next().await;
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = ?self.state, to = ?next, "session transition");
        self.state = next;
    }
}
