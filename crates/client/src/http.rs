use std::env;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use quiz_core::model::{QuizId, UserStats};

use crate::api::{
    AnswerFeedback, AnswerSubmission, ApiError, QuizBackend, QuizCompletion, QuizStartRequest,
    QuizStartResponse,
};
use crate::auth::AuthToken;

/// Base-URL configuration for the quiz service.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Read the base URL from `QUIZ_API_BASE_URL`, falling back to the local
    /// development server.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("QUIZ_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000/api".into());
        Self { base_url }
    }

    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Join a path onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// `QuizBackend` adapter over the service's HTTP API.
#[derive(Clone)]
pub struct HttpQuizBackend {
    client: Client,
    config: ApiConfig,
}

impl HttpQuizBackend {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            status if !status.is_success() => {
                tracing::warn!(%status, "quiz service rejected request");
                Err(ApiError::Status(status))
            }
            _ => Ok(response.json().await?),
        }
    }
}

#[async_trait]
impl QuizBackend for HttpQuizBackend {
    async fn start_quiz(
        &self,
        token: &AuthToken,
        request: &QuizStartRequest,
    ) -> Result<QuizStartResponse, ApiError> {
        tracing::debug!(mode = ?request.mode, "starting quiz");
        let response = self
            .client
            .post(self.config.endpoint("quiz/start"))
            .bearer_auth(token.as_str())
            .json(request)
            .send()
            .await?;

        let body: QuizStartResponse = Self::decode(response).await?;
        if body.questions.is_empty() {
            return Err(ApiError::EmptyQuiz);
        }
        Ok(body)
    }

    async fn submit_answer(
        &self,
        token: &AuthToken,
        quiz_id: QuizId,
        submission: &AnswerSubmission,
    ) -> Result<AnswerFeedback, ApiError> {
        tracing::debug!(%quiz_id, question = %submission.question_id, "submitting answer");
        let response = self
            .client
            .post(self.config.endpoint(&format!("quiz/{quiz_id}/answer")))
            .bearer_auth(token.as_str())
            .json(submission)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn finish_quiz(
        &self,
        token: &AuthToken,
        quiz_id: QuizId,
        completion: &QuizCompletion,
    ) -> Result<(), ApiError> {
        tracing::debug!(%quiz_id, answers = completion.answers.len(), "finishing quiz");
        let response = self
            .client
            .post(self.config.endpoint(&format!("quiz/{quiz_id}/finish")))
            .bearer_auth(token.as_str())
            .json(completion)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        Ok(())
    }

    async fn fetch_stats(&self, token: &AuthToken) -> Result<UserStats, ApiError> {
        let response = self
            .client
            .get(self.config.endpoint("users/stats"))
            .bearer_auth(token.as_str())
            .send()
            .await?;

        Self::decode(response).await
    }
}
