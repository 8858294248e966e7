//! Error types for the LearnFrame client.

/// Top-level error type for the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Signup flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Session store error: {0}")]
    Store(#[from] StoreError),
}

/// Client-side validation errors raised by the signup wizard.
///
/// These block forward progress in the wizard and are never sent to the
/// network; the wizard's answers survive them so the user can correct
/// and retry.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("No role selected")]
    NoRoleSelected,

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Question {question} is not a {expected} question")]
    WrongQuestionKind { question: String, expected: String },

    #[error("Question {question} references {target}, which is not an earlier question")]
    BadConditionalReference { question: String, target: String },
}

/// Authentication and network errors from the session/API adapter.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The server rejected the credentials (or reported `success: false`).
    #[error("Authentication failed: {0}")]
    Rejected(String),

    /// The response matched neither the legacy nor the current auth shape.
    #[error("Unrecognized auth response shape")]
    UnrecognizedShape,

    /// An authorized call returned 401. The local session has been cleared;
    /// the caller should send the user back to the login entry point.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Any other network or non-2xx outcome, with the best available message.
    #[error("Request failed: {0}")]
    Request(String),
}

/// Session persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, Error>;
