//! Transport boundary for all HTTP I/O.
//!
//! The gateway never talks to the network directly; it goes through the
//! [`HttpTransport`] trait. Production code uses [`ReqwestTransport`],
//! unit tests swap in the in-memory `MockTransport` so no test ever opens
//! a socket.

use async_trait::async_trait;
use thiserror::Error;

/// HTTP methods the service API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A fully prepared request: the gateway has already attached headers
/// (content type, authorization) before the transport sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// A raw response: status plus body bytes. Interpretation (status
/// classification, decoding) belongs to the gateway, not the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Failures at the transport level, before any status code exists.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The exchange never completed: DNS, connect, timeout.
    #[error("transport failure: {0}")]
    Io(String),

    /// The server was contacted but its answer could not be read as an
    /// HTTP response.
    #[error("unreadable response")]
    MalformedResponse,

    #[cfg(test)]
    #[error("no mock response registered for {method} {url}")]
    NoMockResponse { method: String, url: String },
}

/// The seam between the gateway and the network.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by reqwest.
///
/// The client holds no mutable session state, so a single instance can be
/// shared freely across tasks.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Io(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in request.headers {
            builder = builder.header(&name, &value);
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;

        let status = resp.status().as_u16();

        // A status line arrived; a body that cannot be read past this point
        // is a malformed response rather than a connection failure.
        let body = resp
            .bytes()
            .await
            .map_err(|_| TransportError::MalformedResponse)?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub use mock::MockTransport;
