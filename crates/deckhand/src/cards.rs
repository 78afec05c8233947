//! Card facade: create, edit, delete.
//!
//! Same credential discipline as the stack facade: no stored token means
//! an immediate [`ApiError::MissingCredential`] with zero network calls.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::models::{Card, CardRequest, DeleteCardRequest};
use crate::token::TokenStore;

#[derive(Clone)]
pub struct CardClient {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
}

impl CardClient {
    pub fn new(api: ApiClient, tokens: Arc<dyn TokenStore>) -> Self {
        Self { api, tokens }
    }

    fn require_token(&self) -> Result<String, ApiError> {
        self.tokens.token().ok_or(ApiError::MissingCredential)
    }

    /// Create a card; the server assigns its identity and returns the
    /// confirmed entity.
    pub async fn create_card(
        &self,
        stack_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<Card, ApiError> {
        let token = self.require_token()?;
        let body = CardRequest {
            stack_id: stack_id.to_string(),
            card_id: None,
            question: question.trim().to_string(),
            answer: answer.trim().to_string(),
        };
        self.api
            .request_with_body(Endpoint::CreateCard, &body, Some(&token))
            .await
    }

    /// Update a card in place; returns the server's confirmed entity.
    pub async fn update_card(
        &self,
        stack_id: &str,
        card_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<Card, ApiError> {
        let token = self.require_token()?;
        let body = CardRequest {
            stack_id: stack_id.to_string(),
            card_id: Some(card_id.to_string()),
            question: question.trim().to_string(),
            answer: answer.trim().to_string(),
        };
        self.api
            .request_with_body(
                Endpoint::UpdateCard {
                    stack_id: stack_id.to_string(),
                    card_id: card_id.to_string(),
                },
                &body,
                Some(&token),
            )
            .await
    }

    /// Delete a card. The body carries a question/answer snapshot of the
    /// card being removed.
    pub async fn delete_card(
        &self,
        stack_id: &str,
        card_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<(), ApiError> {
        let token = self.require_token()?;
        let body = DeleteCardRequest {
            stack_id: stack_id.to_string(),
            card_id: card_id.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        };
        self.api
            .send_with_body(
                Endpoint::DeleteCard {
                    stack_id: stack_id.to_string(),
                    card_id: card_id.to_string(),
                },
                &body,
                Some(&token),
            )
            .await
    }
}
