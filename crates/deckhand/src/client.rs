//! The transport gateway: one HTTP exchange per call, classified into the
//! [`ApiError`] taxonomy.
//!
//! The client is explicitly constructed and dependency-injected; it holds a
//! base URL and a transport and no mutable session state, so clones can be
//! shared across tasks freely. It never retries, never refreshes
//! credentials, and never caches.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::models::ApiErrorResponse;
use crate::multipart::MultipartForm;

/// Typed gateway to the flashcard service.
#[derive(Clone)]
pub struct ApiClient {
    base: String,
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    /// Create a client against `base` (e.g. `https://api.example.com`).
    ///
    /// A malformed base is not rejected here; each call validates the full
    /// URL it builds and fails with [`ApiError::InvalidUrl`] before any
    /// network attempt.
    pub fn new(base: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base: base.into(),
            transport,
        }
    }

    /// GET-style call decoding a JSON response.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let response = self.execute(endpoint, None, None, token).await?;
        decode_body(&response.body)
    }

    /// Call with a JSON body, decoding a JSON response.
    pub async fn request_with_body<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: Endpoint,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let payload = encode_body(body)?;
        let response = self
            .execute(endpoint, Some(payload), Some("application/json"), token)
            .await?;
        decode_body(&response.body)
    }

    /// Call expecting no response body.
    pub async fn send(&self, endpoint: Endpoint, token: Option<&str>) -> Result<(), ApiError> {
        self.execute(endpoint, None, None, token).await?;
        Ok(())
    }

    /// Call with a JSON body, expecting no response body.
    pub async fn send_with_body<B: Serialize>(
        &self,
        endpoint: Endpoint,
        body: &B,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        let payload = encode_body(body)?;
        self.execute(endpoint, Some(payload), Some("application/json"), token)
            .await?;
        Ok(())
    }

    /// Upload a multipart form. Returns only success or failure; the
    /// response body is not decoded.
    pub async fn upload(
        &self,
        endpoint: Endpoint,
        form: MultipartForm,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        let content_type = form.content_type();
        self.execute(endpoint, Some(form.finish()), Some(&content_type), token)
            .await?;
        Ok(())
    }

    /// Perform one exchange and classify the outcome.
    ///
    /// Classification order is part of the contract: URL assembly, then
    /// transport, then 401 (before any range check), then the generic
    /// status range.
    async fn execute(
        &self,
        endpoint: Endpoint,
        body: Option<Vec<u8>>,
        content_type: Option<&str>,
        token: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        let url = endpoint.url(&self.base)?;

        let mut headers = Vec::new();
        if let Some(content_type) = content_type {
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), token.to_string()));
        }

        let request = HttpRequest {
            method: endpoint.method(),
            url: url.to_string(),
            headers,
            body: body.unwrap_or_default(),
        };

        tracing::debug!(method = request.method.as_str(), url = %request.url, "api request");

        let response = self.transport.send(request).await.map_err(|e| match e {
            TransportError::MalformedResponse => ApiError::MalformedResponse,
            other => ApiError::Transport(other.to_string()),
        })?;

        if response.status == 401 {
            return Err(ApiError::Unauthorized);
        }

        if !(200..=299).contains(&response.status) {
            // Best-effort decode of the structured error body; an
            // undecodable body yields no message, never a second error.
            let message = serde_json::from_slice::<ApiErrorResponse>(&response.body)
                .ok()
                .and_then(|e| e.message);
            tracing::debug!(status = response.status, ?message, "api error response");
            return Err(ApiError::HttpStatus {
                status: response.status,
                message,
            });
        }

        Ok(response)
    }
}

fn encode_body<B: Serialize>(body: &B) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}
