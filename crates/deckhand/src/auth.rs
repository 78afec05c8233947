//! Authentication facade: login and signup.
//!
//! Neither operation requires a stored credential; the returned token is
//! handed to the caller, which decides where to keep it.

use crate::client::ApiClient;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::models::{AuthResponse, LoginRequest, SignupRequest};

#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest {
            mail: email.trim().to_string(),
            password: password.to_string(),
        };
        self.api
            .request_with_body(Endpoint::Login, &body, None)
            .await
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let body = SignupRequest {
            name: name.trim().to_string(),
            mail: email.trim().to_string(),
            password: password.to_string(),
        };
        self.api
            .request_with_body(Endpoint::Signup, &body, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::error::messages;
    use crate::http::{HttpMethod, MockTransport};

    fn auth(transport: &MockTransport) -> AuthClient {
        AuthClient::new(ApiClient::new("https://api.test", Arc::new(transport.clone())))
    }

    #[tokio::test]
    async fn login_posts_trimmed_mail_and_returns_token() {
        let transport = MockTransport::new();
        transport.respond_json(
            HttpMethod::Post,
            "https://api.test/login",
            200,
            r#"{"token": "t-1", "username": "ada"}"#,
        );

        let response = auth(&transport)
            .login("  ada@example.com  ", "pw")
            .await
            .expect("login");
        assert_eq!(response.token, "t-1");
        assert_eq!(response.username, "ada");

        let body = String::from_utf8(transport.requests()[0].body.clone()).unwrap();
        assert!(body.contains("\"mail\":\"ada@example.com\""));
    }

    #[tokio::test]
    async fn wrong_credentials_map_to_the_login_family() {
        let transport = MockTransport::new();
        transport.respond_json(
            HttpMethod::Post,
            "https://api.test/login",
            400,
            r#"{"message": "WRONG_PASSWORD"}"#,
        );

        let err = auth(&transport)
            .login("ada@example.com", "nope")
            .await
            .expect_err("wrong password");
        assert_eq!(err.user_message(), messages::LOGIN_FAILED);
    }

    #[tokio::test]
    async fn signup_conflict_maps_to_the_exists_family() {
        let transport = MockTransport::new();
        transport.respond_json(
            HttpMethod::Post,
            "https://api.test/signup",
            409,
            r#"{"message": "USER_ALREADY_EXISTS"}"#,
        );

        let err = auth(&transport)
            .signup("Ada", "ada@example.com", "pw")
            .await
            .expect_err("conflict");
        assert_eq!(err.user_message(), messages::USER_ALREADY_EXISTS);
    }
}
