//! The gateway error taxonomy and its mapping to user-facing messages.
//!
//! Every failure a resource call can produce is one of the [`ApiError`]
//! variants below. Call sites never show these raw; [`ApiError::user_message`]
//! translates them, keyed on the server's machine-readable error code when
//! one is present, with a generic fallback per error family.

use thiserror::Error;

/// User-facing message strings, grouped by error family.
pub mod messages {
    pub const LOGIN_FAILED: &str = "Login failed. Check your credentials.";
    pub const USER_ALREADY_EXISTS: &str =
        "Registration failed. An account with this email already exists.";
    pub const NETWORK: &str = "Network error. Please try again.";
    pub const UNKNOWN: &str = "An unknown error occurred.";
}

/// Errors produced by the transport gateway and the resource clients.
///
/// The taxonomy is deliberately exhaustive: callers match on variants, never
/// on strings or downcasts. `HttpStatus` carries the best-effort decode of a
/// structured error body; a body that fails to decode yields `message: None`
/// rather than a separate error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The endpoint configuration produced an unparsable URL. Raised before
    /// any network attempt.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// The physical exchange could not be completed (DNS, connect, timeout).
    #[error("network error: {0}")]
    Transport(String),

    /// The server was reached but its response had no recognizable shape.
    #[error("malformed response from server")]
    MalformedResponse,

    /// The server answered 401, independent of body content.
    #[error("unauthorized")]
    Unauthorized,

    /// Any non-2xx status other than 401.
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("<no message>"))]
    HttpStatus {
        status: u16,
        /// Machine-readable code from the error body, when decodable.
        message: Option<String>,
    },

    /// A 2xx response whose body did not decode into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// No credential was locally available; the call was never attempted.
    /// Handled the same as [`ApiError::Unauthorized`] by the app shell.
    #[error("no stored credential")]
    MissingCredential,
}

impl ApiError {
    /// Translate this error into a user-facing message.
    ///
    /// Server codes `USER_NOT_FOUND` and `WRONG_PASSWORD` map to the login
    /// family, as does a bare 400 with no code (the service answers wrong
    /// credentials that way). `USER_ALREADY_EXISTS` maps to the signup
    /// conflict family. Everything unrecognized falls back per family.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::HttpStatus {
                status: 400,
                message: None,
            } => messages::LOGIN_FAILED,
            ApiError::HttpStatus { message, .. } => match message.as_deref() {
                Some("USER_NOT_FOUND") | Some("WRONG_PASSWORD") => messages::LOGIN_FAILED,
                Some("USER_ALREADY_EXISTS") => messages::USER_ALREADY_EXISTS,
                _ => messages::UNKNOWN,
            },
            ApiError::Transport(_) => messages::NETWORK,
            _ => messages::UNKNOWN,
        }
    }

    /// Whether the app shell should force re-authentication.
    #[must_use]
    pub fn requires_reauth(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::MissingCredential)
    }
}
