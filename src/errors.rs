use std::str::FromStr;

use thiserror::Error;

/// Error type returned by task functions.
///
/// Any error that is `Send + Sync + 'static` converts into it with `?`,
/// including [`GenericError`].
pub type TaskError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for SQS worker pool operations.
///
/// Configuration and initialization errors are returned synchronously from
/// [`start_workers`](crate::worker::start_workers). Receive and task errors are
/// surfaced on the pool's error channel. Delete errors never leave the worker;
/// they are only logged.
#[derive(Debug, Error)]
pub enum SqsWorkerError {
    /// The worker pool configuration is invalid.
    #[error("invalid worker configuration: {0}")]
    InvalidConfig(String),

    /// Error that occurs during AWS SQS client initialization.
    ///
    /// This error typically happens when the queue identity is incomplete or
    /// out of range for the SQS API.
    #[error("failed to initialize AWS SQS client: {0}")]
    InitializationError(String),

    /// Receiving messages from the queue failed.
    #[error("failed to receive messages: {0}")]
    ReceiveError(String),

    /// The task function returned an error or panicked while handling a message.
    #[error("failed to execute task on message {message_id}: {source}")]
    TaskError {
        message_id: String,
        #[source]
        source: TaskError,
    },

    #[error("failed to delete message {message_id}: {reason}")]
    DeleteError { message_id: String, reason: String },

    #[error("failed to send message: {0}")]
    SendError(String),

    /// A worker task ended abnormally instead of observing the stop signal.
    #[error("worker task failed: {0}")]
    WorkerJoinError(String),

    #[error("{0}")]
    GenericError(#[from] GenericError),
}

impl SqsWorkerError {
    /// Returns the id of the message this error relates to, if any.
    pub fn message_id(&self) -> Option<&str> {
        match self {
            SqsWorkerError::TaskError { message_id, .. }
            | SqsWorkerError::DeleteError { message_id, .. } => Some(message_id),
            _ => None,
        }
    }
}

/// Generic error type for handling unexpected errors.
#[derive(Debug, Error)]
pub struct GenericError(String);

impl GenericError {
    /// Creates a new `GenericError` with the provided message.
    pub fn new(message: impl Into<String>) -> Self {
        GenericError(message.into())
    }
}

impl std::fmt::Display for GenericError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GenericError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(GenericError::new(s))
    }
}

impl From<String> for GenericError {
    fn from(s: String) -> Self {
        GenericError::new(s)
    }
}

impl From<&str> for GenericError {
    fn from(s: &str) -> Self {
        GenericError::new(s)
    }
}
