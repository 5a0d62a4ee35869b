//! Shared error types for the services crate.

use thiserror::Error;

use quiz_client::ApiError;

/// Errors emitted by the quiz session engine.
///
/// Answer-relay failures are absent here: they are non-fatal and travel as
/// a `Delivery` outcome instead of an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,

    #[error("session already finished")]
    Finished,

    /// Fatal for quiz entry. The caller abandons the attempt and returns to
    /// the home view; no partial session is retained and nothing is retried.
    #[error("could not start quiz session: {0}")]
    Start(#[source] ApiError),
}
