//! Inquire Error Types
//!
//! Domain error variants for the Q&A service. Rule violations and request
//! validation failures travel as `success: false` envelopes under HTTP 200;
//! only authorization (401) and integrity/infrastructure failures (5xx)
//! change the status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::envelope::Envelope;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type InquireResult<T> = Result<T, InquireError>;

#[derive(Debug, Error)]
pub enum InquireError {
    /// Wrong HTTP method for the endpoint
    #[error("{0} requests are not allowed.")]
    MethodNotAllowed(String),

    #[error("'{0}' is required.")]
    MissingParameter(String),

    #[error("'{0}' must be a number.")]
    InvalidNumber(String),

    /// Input failed a value-object rule (email format, password policy, range)
    #[error("{0}")]
    InvalidInput(String),

    #[error("Email address already exists.")]
    EmailTaken,

    #[error("Email or password is invalid.")]
    InvalidCredentials,

    /// More than one account shares an email address
    #[error("Internal security error. Contact an administrator")]
    DuplicateAccount,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Question does not exist.")]
    QuestionNotFound,

    /// Listing answers of an unknown question
    #[error("Question does not exist!")]
    AnswersQuestionNotFound,

    #[error("Question has an accepted answer and is now closed.")]
    QuestionClosed,

    #[error("Answer does not exist.")]
    AnswerNotFound,

    #[error("You must be the owner of the question to accept an answer.")]
    NotQuestionOwner,

    #[error("Question already has an accepted answer.")]
    AlreadyAccepted,

    #[error("No users found")]
    NoSeedUsers,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl InquireError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            InquireError::Unauthorized => StatusCode::UNAUTHORIZED,
            InquireError::DuplicateAccount | InquireError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            InquireError::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            InquireError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        }
    }

    /// Classification used for log severity
    pub fn kind(&self) -> ErrorKind {
        match self {
            InquireError::MethodNotAllowed(_)
            | InquireError::MissingParameter(_)
            | InquireError::InvalidNumber(_)
            | InquireError::InvalidInput(_) => ErrorKind::BadRequest,
            InquireError::EmailTaken | InquireError::AlreadyAccepted => ErrorKind::Conflict,
            InquireError::InvalidCredentials | InquireError::Unauthorized => {
                ErrorKind::Unauthorized
            }
            InquireError::NotQuestionOwner => ErrorKind::Forbidden,
            InquireError::QuestionNotFound
            | InquireError::AnswersQuestionNotFound
            | InquireError::AnswerNotFound
            | InquireError::NoSeedUsers => ErrorKind::NotFound,
            InquireError::QuestionClosed => ErrorKind::Conflict,
            InquireError::DuplicateAccount
            | InquireError::Database(_)
            | InquireError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message shown to the client
    ///
    /// Infrastructure detail never leaves the server.
    pub fn client_message(&self) -> String {
        match self {
            InquireError::Database(_) | InquireError::Internal(_) => {
                ErrorKind::InternalServerError.as_str().to_string()
            }
            other => other.to_string(),
        }
    }

    fn log(&self) {
        match self {
            InquireError::Database(e) => {
                tracing::error!(error = %e, "Inquire database error");
            }
            InquireError::Internal(msg) => {
                tracing::error!(message = %msg, "Inquire internal error");
            }
            InquireError::DuplicateAccount => {
                tracing::error!("Several accounts share one email address");
            }
            InquireError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Inquire request rejected");
            }
        }
    }
}

impl IntoResponse for InquireError {
    fn into_response(self) -> Response {
        self.log();
        match self {
            InquireError::Database(e) => AppError::from(e).into_response(),
            other => Envelope::failure(other.client_message())
                .into_response_with_status(other.status_code()),
        }
    }
}

impl From<AppError> for InquireError {
    fn from(err: AppError) -> Self {
        if err.is_client_error() {
            InquireError::InvalidInput(err.message().to_string())
        } else {
            InquireError::Internal(err.to_string())
        }
    }
}

impl From<serde_json::Error> for InquireError {
    fn from(err: serde_json::Error) -> Self {
        InquireError::Internal(format!("JSON serialization failed: {err}"))
    }
}

impl From<platform::password::PasswordHashError> for InquireError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        InquireError::Internal(err.to_string())
    }
}
