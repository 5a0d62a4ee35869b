use std::fmt;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::http::ApiConfig;

/// Opaque bearer-token handle issued by the quiz service at login.
///
/// Passed explicitly to every backend call; nothing in this workspace stores
/// it in process-wide state.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep the raw token out of logs.
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken(<redacted>)")
    }
}

/// Login payload for `POST /users/login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration payload for `POST /users/register`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Thin client for the auth endpoints that issue bearer tokens.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    config: ApiConfig,
}

impl AuthClient {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` on rejected credentials, other
    /// `ApiError` variants on transport or service failures.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken, ApiError> {
        self.token_request("users/login", credentials).await
    }

    /// Create an account and receive its first bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or service failures.
    pub async fn register(&self, registration: &Registration) -> Result<AuthToken, ApiError> {
        self.token_request("users/register", registration).await
    }

    async fn token_request<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<AuthToken, ApiError> {
        let response = self
            .client
            .post(self.config.endpoint(path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            tracing::warn!(%status, path, "auth request rejected");
            return Err(ApiError::Status(status));
        }

        let body: TokenResponse = response.json().await?;
        Ok(AuthToken::new(body.access_token))
    }
}
