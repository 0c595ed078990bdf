use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use aws_sdk_sqs::types::Message;
use futures::FutureExt;
use thiserror::Error;

use crate::errors::TaskError;

/// Transformation applied to the error recovered from a panicking task.
pub type PanicTransform = Arc<dyn Fn(TaskError) -> TaskError + Send + Sync>;

static RECOVER_FUNC: OnceLock<PanicTransform> = OnceLock::new();

/// Registers the process-wide transformation for errors recovered from
/// panicking tasks.
///
/// Only the first call has an effect; later calls are ignored. A pool
/// configured with its own [`panic_transform`](crate::worker::WorkersParams::panic_transform)
/// does not consult this function.
pub fn set_recover_func<F>(f: F)
where
    F: Fn(TaskError) -> TaskError + Send + Sync + 'static,
{
    let _ = RECOVER_FUNC.set(Arc::new(f));
}

/// Business logic run by the workers for every received message.
///
/// Returning an error leaves the message on the queue so that it is
/// redelivered once its visibility timeout expires. Closures of the form
/// `Fn(Message) -> impl Future<Output = Result<(), TaskError>>` implement this
/// trait.
#[async_trait]
pub trait SqsTask: Send + Sync + 'static {
    async fn execute(&self, message: Message) -> Result<(), TaskError>;
}

#[async_trait]
impl<F, Fut> SqsTask for F
where
    F: Fn(Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    async fn execute(&self, message: Message) -> Result<(), TaskError> {
        (self)(message).await
    }
}

/// Error produced when a task panics.
#[derive(Debug, Error)]
#[error("task panicked: {payload}")]
pub struct PanicError {
    payload: String,
}

impl PanicError {
    /// The panic payload rendered as text.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// A task wrapped with panic isolation.
pub(crate) struct GuardedTask {
    task: Arc<dyn SqsTask>,
    panic_transform: Option<PanicTransform>,
}

impl GuardedTask {
    pub(crate) fn new(task: Arc<dyn SqsTask>, panic_transform: Option<PanicTransform>) -> Self {
        GuardedTask {
            task,
            panic_transform,
        }
    }

    /// Runs the task; a panic is converted into an error instead of unwinding
    /// into the worker.
    pub(crate) async fn run(&self, message: Message) -> Result<(), TaskError> {
        let task = Arc::clone(&self.task);
        let outcome = AssertUnwindSafe(async move { task.execute(message).await })
            .catch_unwind()
            .await;

        match outcome {
            Ok(result) => result,
            Err(payload) => Err(self.recover(payload)),
        }
    }

    fn recover(&self, payload: Box<dyn Any + Send>) -> TaskError {
        let err = panic_payload_into_error(payload);
        match self.panic_transform.as_ref().or_else(|| RECOVER_FUNC.get()) {
            Some(transform) => transform(err),
            None => err,
        }
    }
}

fn panic_payload_into_error(payload: Box<dyn Any + Send>) -> TaskError {
    // panic_any(err) with a boxed error keeps the original error
    let payload = match payload.downcast::<TaskError>() {
        Ok(err) => return *err,
        Err(payload) => payload,
    };

    let payload = match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast_ref::<&'static str>() {
            Some(message) => message.to_string(),
            None => "non-string panic payload".to_string(),
        },
    };

    Box::new(PanicError { payload })
}
