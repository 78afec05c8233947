//! Stack facade: listing, creation, deletion, review traffic, and the
//! document upload that generates cards server-side.
//!
//! Every operation here requires a locally available credential. A missing
//! credential fails immediately with [`ApiError::MissingCredential`] and
//! never touches the network.

use std::sync::Arc;

use thiserror::Error;

use crate::client::ApiClient;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::models::{Card, CardRatingRequest, CreateStackRequest, Stack};
use crate::multipart::MultipartForm;
use crate::token::TokenStore;

/// Client-side cap on generation uploads.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Failures of the card-generation upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The selected file exceeds [`MAX_UPLOAD_BYTES`]. Raised before any
    /// network attempt.
    #[error("file is {size} bytes, over the {max} byte upload limit")]
    FileTooLarge { size: usize, max: usize },

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Clone)]
pub struct StackClient {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
}

impl StackClient {
    pub fn new(api: ApiClient, tokens: Arc<dyn TokenStore>) -> Self {
        Self { api, tokens }
    }

    fn require_token(&self) -> Result<String, ApiError> {
        self.tokens.token().ok_or(ApiError::MissingCredential)
    }

    /// List the user's stacks.
    pub async fn list_stacks(&self) -> Result<Vec<Stack>, ApiError> {
        let token = self.require_token()?;
        self.api.request(Endpoint::Stacks, Some(&token)).await
    }

    /// Create a stack; the server assigns its identity.
    pub async fn create_stack(&self, name: &str, color: &str) -> Result<Stack, ApiError> {
        let token = self.require_token()?;
        let body = CreateStackRequest {
            name: name.trim().to_string(),
            color: color.to_string(),
        };
        self.api
            .request_with_body(Endpoint::CreateStack, &body, Some(&token))
            .await
    }

    /// Fetch one stack including its cards.
    pub async fn fetch_stack(&self, unique_id: &str) -> Result<Stack, ApiError> {
        let token = self.require_token()?;
        self.api
            .request(
                Endpoint::Stack {
                    unique_id: unique_id.to_string(),
                },
                Some(&token),
            )
            .await
    }

    pub async fn delete_stack(&self, unique_id: &str) -> Result<(), ApiError> {
        let token = self.require_token()?;
        self.api
            .send(
                Endpoint::DeleteStack {
                    unique_id: unique_id.to_string(),
                },
                Some(&token),
            )
            .await
    }

    /// Fetch the next card due within `days_ahead` days.
    ///
    /// A 404 from this endpoint means "nothing due", so it is recovered
    /// into `Ok(None)` here and never reaches the message-mapping layer.
    /// This is the only place the taxonomy's meaning is locally overridden;
    /// every other status propagates unchanged.
    pub async fn fetch_next_card(
        &self,
        stack_id: &str,
        days_ahead: u32,
    ) -> Result<Option<Card>, ApiError> {
        let token = self.require_token()?;
        let endpoint = Endpoint::NextCard {
            stack_id: stack_id.to_string(),
            days_ahead,
        };
        match self.api.request(endpoint, Some(&token)).await {
            Ok(card) => Ok(Some(card)),
            Err(ApiError::HttpStatus { status: 404, .. }) => Ok(None),
            Err(other) => Err(other),
        }
    }

    /// Submit the user's difficulty rating for a reviewed card.
    pub async fn submit_rating(
        &self,
        stack_id: &str,
        card_id: &str,
        difficulty_id: i64,
    ) -> Result<(), ApiError> {
        let token = self.require_token()?;
        let body = CardRatingRequest {
            stack_id: stack_id.to_string(),
            card_id: card_id.to_string(),
            difficulty_id,
        };
        self.api
            .send_with_body(Endpoint::SubmitRating, &body, Some(&token))
            .await
    }

    /// Upload a document and have the server generate cards from it.
    ///
    /// The file part goes first, followed by the instructions field. The
    /// size cap is enforced before the credential guard so an oversized
    /// file never costs a network attempt either way.
    pub async fn generate_from_file(
        &self,
        stack_id: &str,
        file: &[u8],
        filename: &str,
        instructions: &str,
    ) -> Result<(), UploadError> {
        if file.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::FileTooLarge {
                size: file.len(),
                max: MAX_UPLOAD_BYTES,
            });
        }

        let token = self.require_token()?;

        let mut form = MultipartForm::new();
        form.add_file("file", filename, "application/pdf", file);
        form.add_field("custom-instructions", instructions.trim());

        self.api
            .upload(
                Endpoint::CreateFromFile {
                    stack_id: stack_id.to_string(),
                },
                form,
                Some(&token),
            )
            .await?;
        Ok(())
    }
}
