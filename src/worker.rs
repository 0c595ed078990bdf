use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::{QueueClient, SqsQueueClient};
use crate::errors::SqsWorkerError;
use crate::logger::{Logger, TracingLogger};

pub mod config;
pub mod reporter;
pub mod task;
mod worker_loop;

pub use config::WorkersParams;
pub use reporter::ErrorReceiver;
pub use task::{PanicError, PanicTransform, SqsTask, set_recover_func};

use reporter::ErrorReporter;
use task::GuardedTask;
use worker_loop::Worker;

/// Handle over the workers of a running pool.
///
/// Dropping the handle does not stop the workers; they run until the stop
/// signal passed to [`start_workers`] fires.
#[derive(Debug)]
pub struct SqsWorkerPool {
    handles: Vec<JoinHandle<()>>,
    dropped_errors: Arc<AtomicU64>,
    stop: CancellationToken,
}

impl SqsWorkerPool {
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Number of errors discarded because the error channel was full or closed.
    pub fn dropped_errors(&self) -> u64 {
        self.dropped_errors.load(Ordering::Relaxed)
    }

    /// Returns `true` once every worker has exited.
    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(JoinHandle::is_finished)
    }

    /// Waits until every worker has exited.
    ///
    /// This only completes after the stop signal has fired.
    pub async fn join(self) -> Result<(), SqsWorkerError> {
        let mut first_err = None;
        for handle in self.handles {
            if let Err(err) = handle.await {
                first_err.get_or_insert(SqsWorkerError::WorkerJoinError(err.to_string()));
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Fires the stop signal and waits for every worker to exit.
    pub async fn shutdown(self) -> Result<(), SqsWorkerError> {
        self.stop.cancel();
        self.join().await
    }
}

/// Starts a pool of workers reading messages from an SQS queue and handling
/// them with the configured task.
///
/// The configuration is validated and the queue client built before any
/// worker is spawned, so an error here means nothing is running. On success
/// exactly `params.worker_count` workers poll the queue until `stop` is
/// cancelled. Failed receives and failed tasks are reported on the returned
/// channel; it is best-effort and errors are dropped while it is full.
///
/// # Example
///
/// ```rust,no_run
/// use sqs_worker_pool::client::ClientParams;
/// use sqs_worker_pool::worker::{WorkersParams, start_workers};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let params = WorkersParams::new(
///         ClientParams::new("eu-west-1", "https://sqs.eu-west-1.amazonaws.com/123/jobs"),
///         |message: aws_sdk_sqs::types::Message| async move {
///             println!("handling {:?}", message.message_id());
///             Ok(())
///         },
///     )
///     .with_worker_count(4);
///
///     let stop = CancellationToken::new();
///     let (pool, mut errors) = start_workers(params, stop.clone()).await?;
///
///     tokio::spawn(async move {
///         while let Some(err) = errors.recv().await {
///             eprintln!("worker error: {err}");
///         }
///     });
///
///     tokio::signal::ctrl_c().await?;
///     stop.cancel();
///     pool.join().await?;
///     Ok(())
/// }
/// ```
pub async fn start_workers(
    params: WorkersParams,
    stop: CancellationToken,
) -> Result<(SqsWorkerPool, ErrorReceiver), SqsWorkerError> {
    params.validate()?;

    let logger: Arc<dyn Logger> = params
        .logger
        .clone()
        .unwrap_or_else(|| Arc::new(TracingLogger));

    let client: Arc<dyn QueueClient> = match params.client {
        Some(client) => client,
        None => Arc::new(SqsQueueClient::new(params.client_params.clone()).await?),
    };

    let task = Arc::new(GuardedTask::new(params.task, params.panic_transform));
    let (reporter, errors) = ErrorReporter::channel(params.error_channel_capacity);
    let dropped_errors = reporter.dropped_counter();

    let handles = (0..params.worker_count)
        .map(|id| {
            let worker = Worker {
                id,
                client: Arc::clone(&client),
                task: Arc::clone(&task),
                reporter: reporter.clone(),
                stop: stop.clone(),
                logger: Arc::clone(&logger),
                empty_poll_delay: params.empty_poll_delay,
            };
            tokio::spawn(worker.run())
        })
        .collect::<Vec<_>>();

    logger.info(format_args!(
        "sqsworker : started {} workers on {}",
        handles.len(),
        params.client_params.queue_url
    ));

    Ok((
        SqsWorkerPool {
            handles,
            dropped_errors,
            stop,
        },
        errors,
    ))
}
