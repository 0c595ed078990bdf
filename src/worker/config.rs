use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use aws_sdk_sqs::types::Message;

use crate::client::{ClientParams, QueueClient};
use crate::errors::{SqsWorkerError, TaskError};
use crate::logger::Logger;
use crate::worker::task::{PanicTransform, SqsTask};

/// Default capacity of the error channel returned by the pool.
pub const DEFAULT_ERROR_CHANNEL_CAPACITY: usize = 16;

/// Configuration of a worker pool.
///
/// # Example
///
/// ```rust
/// use sqs_worker_pool::client::ClientParams;
/// use sqs_worker_pool::worker::WorkersParams;
///
/// let params = WorkersParams::new(
///     ClientParams::new("eu-west-1", "https://sqs.eu-west-1.amazonaws.com/123/jobs"),
///     |message: aws_sdk_sqs::types::Message| async move {
///         println!("{:?}", message.body());
///         Ok(())
///     },
/// )
/// .with_worker_count(4);
///
/// assert_eq!(params.worker_count, 4);
/// ```
#[derive(Clone)]
pub struct WorkersParams {
    /// Identity of the queue to poll.
    pub client_params: ClientParams,

    /// Pre-built queue client. When absent one is created from `client_params`.
    pub client: Option<Arc<dyn QueueClient>>,

    /// Number of concurrent workers to spawn.
    pub worker_count: usize,

    /// Task run once for every received message.
    pub task: Arc<dyn SqsTask>,

    /// Defaults to [`TracingLogger`](crate::logger::TracingLogger).
    pub logger: Option<Arc<dyn Logger>>,

    /// Applied to errors recovered from a panicking task.
    pub panic_transform: Option<PanicTransform>,

    /// Number of unread errors buffered before further errors are dropped.
    pub error_channel_capacity: usize,

    /// Pause after an empty poll. Zero only yields to the scheduler.
    pub empty_poll_delay: Duration,
}

impl WorkersParams {
    /// Creates a configuration with a single worker and default settings,
    /// running `task` for every message.
    pub fn new<F, Fut>(client_params: ClientParams, task: F) -> Self
    where
        F: Fn(Message) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        Self::from_task(client_params, Arc::new(task))
    }

    /// Like [`WorkersParams::new`] for tasks implemented as a type.
    pub fn from_task(client_params: ClientParams, task: Arc<dyn SqsTask>) -> Self {
        WorkersParams {
            client_params,
            client: None,
            worker_count: 1,
            task,
            logger: None,
            panic_transform: None,
            error_channel_capacity: DEFAULT_ERROR_CHANNEL_CAPACITY,
            empty_poll_delay: Duration::ZERO,
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_client(mut self, client: Arc<dyn QueueClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_panic_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(TaskError) -> TaskError + Send + Sync + 'static,
    {
        self.panic_transform = Some(Arc::new(transform));
        self
    }

    pub fn with_error_channel_capacity(mut self, capacity: usize) -> Self {
        self.error_channel_capacity = capacity;
        self
    }

    pub fn with_empty_poll_delay(mut self, delay: Duration) -> Self {
        self.empty_poll_delay = delay;
        self
    }

    /// Checks the configuration before any worker is started.
    pub fn validate(&self) -> Result<(), SqsWorkerError> {
        if self.worker_count < 1 {
            return Err(SqsWorkerError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.client_params.queue_url.is_empty() {
            return Err(SqsWorkerError::InvalidConfig("missing queue url".to_string()));
        }
        if self.client.is_none() && self.client_params.region.is_empty() {
            return Err(SqsWorkerError::InvalidConfig(
                "missing region, required because no client is set".to_string(),
            ));
        }
        if self.error_channel_capacity < 1 {
            return Err(SqsWorkerError::InvalidConfig(
                "error channel capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
