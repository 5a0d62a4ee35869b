#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod http;
pub mod memory;

pub use api::{
    AnswerFeedback, AnswerSubmission, ApiError, QuizBackend, QuizCompletion, QuizStartRequest,
    QuizStartResponse, SubmittedAnswer,
};
pub use auth::{AuthClient, AuthToken, Credentials, Registration};
pub use http::{ApiConfig, HttpQuizBackend};
pub use memory::InMemoryBackend;
