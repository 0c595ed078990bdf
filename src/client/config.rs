use std::env;
use std::str::FromStr;

use crate::errors::SqsWorkerError;

/// Upper bound the SQS API accepts for `MaxNumberOfMessages`.
pub const SQS_MAX_BATCH_SIZE: i32 = 10;

/// Upper bound the SQS API accepts for `WaitTimeSeconds`.
pub const SQS_MAX_WAIT_TIME_SECONDS: i32 = 20;

/// Connection parameters identifying the queue to poll.
///
/// # Fields
/// - `region`: The AWS region hosting the queue.
/// - `queue_url`: The URL of the SQS queue.
/// - `max_received_messages`: The maximum number of messages a single receive may return.
/// - `wait_time_seconds`: The wait time for long polling, in seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientParams {
    /// The AWS region where the SQS queue is hosted.
    pub region: String,

    /// The URL of the SQS queue.
    pub queue_url: String,

    /// The maximum number of messages to receive in a single request.
    pub max_received_messages: i32,

    /// The wait time for long polling, in seconds.
    pub wait_time_seconds: i32,
}

impl Default for ClientParams {
    fn default() -> Self {
        ClientParams {
            region: String::new(),
            queue_url: String::new(),
            max_received_messages: SQS_MAX_BATCH_SIZE,
            wait_time_seconds: SQS_MAX_WAIT_TIME_SECONDS,
        }
    }
}

impl ClientParams {
    pub fn new(region: impl Into<String>, queue_url: impl Into<String>) -> Self {
        ClientParams {
            region: region.into(),
            queue_url: queue_url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_received_messages(mut self, max: i32) -> Self {
        self.max_received_messages = max;
        self
    }

    pub fn with_wait_time_seconds(mut self, seconds: i32) -> Self {
        self.wait_time_seconds = seconds;
        self
    }

    /// Loads the queue identity from the environment.
    ///
    /// Reads `AWS_REGION` and `SQS_QUEUE_URL`, plus the optional
    /// `SQS_MAX_RECEIVED_MESSAGES` and `SQS_WAIT_TIME_SECONDS`. Missing
    /// required variables are left empty and caught by validation later.
    pub fn from_env() -> Result<Self, SqsWorkerError> {
        let mut params = ClientParams::new(
            env::var("AWS_REGION").unwrap_or_default(),
            env::var("SQS_QUEUE_URL").unwrap_or_default(),
        );

        if let Some(max) = parse_env_var("SQS_MAX_RECEIVED_MESSAGES")? {
            params.max_received_messages = max;
        }
        if let Some(wait) = parse_env_var("SQS_WAIT_TIME_SECONDS")? {
            params.wait_time_seconds = wait;
        }

        Ok(params)
    }

    /// Checks the parameters against the limits of the SQS API.
    pub fn validate(&self) -> Result<(), SqsWorkerError> {
        if self.queue_url.is_empty() {
            return Err(SqsWorkerError::InitializationError(
                "missing queue url".to_string(),
            ));
        }
        if !(1..=SQS_MAX_BATCH_SIZE).contains(&self.max_received_messages) {
            return Err(SqsWorkerError::InitializationError(format!(
                "max received messages must be from 1 to {SQS_MAX_BATCH_SIZE}, got {}",
                self.max_received_messages
            )));
        }
        if !(0..=SQS_MAX_WAIT_TIME_SECONDS).contains(&self.wait_time_seconds) {
            return Err(SqsWorkerError::InitializationError(format!(
                "wait time seconds must be from 0 to {SQS_MAX_WAIT_TIME_SECONDS}, got {}",
                self.wait_time_seconds
            )));
        }
        Ok(())
    }
}

fn parse_env_var<T: FromStr>(name: &str) -> Result<Option<T>, SqsWorkerError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SqsWorkerError::InvalidConfig(format!("{name} is not a valid number: {raw}"))),
        Err(_) => Ok(None),
    }
}
