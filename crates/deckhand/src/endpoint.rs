//! Typed endpoints of the flashcard service API.
//!
//! Each variant corresponds to one operation of the service. The enum owns
//! the path parameters, so a constructed endpoint is always complete; URL
//! assembly is the only thing that can still fail, and it fails before any
//! network attempt.

use url::Url;

use crate::error::ApiError;
use crate::http::HttpMethod;

/// One operation of the flashcard service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Signup,
    /// List the user's stacks.
    Stacks,
    CreateStack,
    /// Fetch one stack including its cards.
    Stack { unique_id: String },
    DeleteStack { unique_id: String },
    CreateCard,
    UpdateCard { stack_id: String, card_id: String },
    DeleteCard { stack_id: String, card_id: String },
    /// Multipart upload generating cards from a document.
    CreateFromFile { stack_id: String },
    /// The next due card, widened by `days_ahead` ("learn ahead").
    NextCard { stack_id: String, days_ahead: u32 },
    SubmitRating,
}

impl Endpoint {
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::Login
            | Endpoint::Signup
            | Endpoint::CreateStack
            | Endpoint::CreateCard
            | Endpoint::CreateFromFile { .. }
            | Endpoint::SubmitRating => HttpMethod::Post,
            Endpoint::Stacks | Endpoint::Stack { .. } | Endpoint::NextCard { .. } => {
                HttpMethod::Get
            }
            Endpoint::UpdateCard { .. } => HttpMethod::Put,
            Endpoint::DeleteStack { .. } | Endpoint::DeleteCard { .. } => HttpMethod::Delete,
        }
    }

    /// Path and query relative to the service base URL.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Endpoint::Login => "/login".to_string(),
            Endpoint::Signup => "/signup".to_string(),
            Endpoint::Stacks | Endpoint::CreateStack => "/stack".to_string(),
            Endpoint::Stack { unique_id } | Endpoint::DeleteStack { unique_id } => {
                format!("/stack/{unique_id}")
            }
            Endpoint::CreateCard => "/card".to_string(),
            Endpoint::UpdateCard { stack_id, card_id }
            | Endpoint::DeleteCard { stack_id, card_id } => {
                format!("/stack/{stack_id}/card/{card_id}")
            }
            Endpoint::CreateFromFile { stack_id } => format!("/stack/{stack_id}/createFromFile"),
            Endpoint::NextCard {
                stack_id,
                days_ahead,
            } => format!("/stack/{stack_id}/card/next?days-ahead={days_ahead}"),
            Endpoint::SubmitRating => "/stack/rating".to_string(),
        }
    }

    /// Assemble the full request URL against `base`.
    ///
    /// A base that does not parse into an absolute URL is a configuration
    /// error and fails here, before anything touches the network.
    pub fn url(&self, base: &str) -> Result<Url, ApiError> {
        let full = format!("{}{}", base.trim_end_matches('/'), self.path());
        Url::parse(&full).map_err(|_| ApiError::InvalidUrl(full))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.test";

    #[test]
    fn paths_match_the_service_routes() {
        assert_eq!(Endpoint::Login.path(), "/login");
        assert_eq!(Endpoint::Signup.path(), "/signup");
        assert_eq!(Endpoint::Stacks.path(), "/stack");
        assert_eq!(Endpoint::CreateStack.path(), "/stack");
        assert_eq!(
            Endpoint::Stack {
                unique_id: "abc".to_string()
            }
            .path(),
            "/stack/abc"
        );
        assert_eq!(Endpoint::CreateCard.path(), "/card");
        assert_eq!(
            Endpoint::DeleteCard {
                stack_id: "s1".to_string(),
                card_id: "c1".to_string()
            }
            .path(),
            "/stack/s1/card/c1"
        );
        assert_eq!(
            Endpoint::CreateFromFile {
                stack_id: "s1".to_string()
            }
            .path(),
            "/stack/s1/createFromFile"
        );
        assert_eq!(
            Endpoint::NextCard {
                stack_id: "s1".to_string(),
                days_ahead: 2
            }
            .path(),
            "/stack/s1/card/next?days-ahead=2"
        );
        assert_eq!(Endpoint::SubmitRating.path(), "/stack/rating");
    }

    #[test]
    fn methods_match_the_service_routes() {
        assert_eq!(Endpoint::Login.method(), HttpMethod::Post);
        assert_eq!(Endpoint::Stacks.method(), HttpMethod::Get);
        assert_eq!(
            Endpoint::UpdateCard {
                stack_id: "s".to_string(),
                card_id: "c".to_string()
            }
            .method(),
            HttpMethod::Put
        );
        assert_eq!(
            Endpoint::DeleteStack {
                unique_id: "s".to_string()
            }
            .method(),
            HttpMethod::Delete
        );
        assert_eq!(Endpoint::SubmitRating.method(), HttpMethod::Post);
    }

    #[test]
    fn url_joins_base_and_path() {
        let url = Endpoint::Stacks.url(BASE).expect("valid url");
        assert_eq!(url.as_str(), "https://api.test/stack");

        // Trailing slash on the base must not double up.
        let url = Endpoint::Stacks.url("https://api.test/").expect("valid url");
        assert_eq!(url.as_str(), "https://api.test/stack");
    }

    #[test]
    fn malformed_base_fails_before_any_network_attempt() {
        let err = Endpoint::Stacks.url("not a url").expect_err("bad base");
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }
}
