use std::sync::Arc;
use std::time::Duration;

use aws_sdk_sqs::types::Message;
use tokio_util::sync::CancellationToken;

use crate::client::QueueClient;
use crate::errors::SqsWorkerError;
use crate::logger::Logger;
use crate::worker::reporter::ErrorReporter;
use crate::worker::task::GuardedTask;

/// Each worker handles one message at a time.
const MESSAGES_PER_POLL: i32 = 1;

enum Polled {
    Message(Message),
    Empty,
    Stopped,
}

/// A single polling worker. Receives, executes and deletes messages in
/// sequence until the stop signal fires.
pub(crate) struct Worker {
    pub(crate) id: usize,
    pub(crate) client: Arc<dyn QueueClient>,
    pub(crate) task: Arc<GuardedTask>,
    pub(crate) reporter: ErrorReporter,
    pub(crate) stop: CancellationToken,
    pub(crate) logger: Arc<dyn Logger>,
    pub(crate) empty_poll_delay: Duration,
}

impl Worker {
    pub(crate) async fn run(self) {
        self.logger
            .debug(format_args!("sqsworker : worker {} started", self.id));

        loop {
            match self.poll().await {
                Ok(Polled::Stopped) => break,
                Ok(Polled::Empty) => {
                    if self.idle().await {
                        break;
                    }
                }
                Ok(Polled::Message(message)) => {
                    if let Err(err) = self.execute(message).await {
                        self.handle_error(err);
                    }
                }
                Err(err) => {
                    self.handle_error(err);
                    if self.idle().await {
                        break;
                    }
                }
            }
        }

        self.logger
            .debug(format_args!("sqsworker : worker {} stopped", self.id));
    }

    /// Receives at most one message, giving up as soon as the stop signal fires.
    ///
    /// Losing the race drops the pending receive, which abandons the
    /// underlying request.
    async fn poll(&self) -> Result<Polled, SqsWorkerError> {
        if self.stop.is_cancelled() {
            return Ok(Polled::Stopped);
        }

        let poll_token = self.stop.child_token();
        let messages = tokio::select! {
            biased;
            _ = poll_token.cancelled() => return Ok(Polled::Stopped),
            result = self.client.receive_messages(MESSAGES_PER_POLL) => result?,
        };

        Ok(messages
            .into_iter()
            .next()
            .map_or(Polled::Empty, Polled::Message))
    }

    async fn execute(&self, message: Message) -> Result<(), SqsWorkerError> {
        let message_id = message.message_id().unwrap_or_default().to_string();
        self.logger
            .debug(format_args!("sqsworker : in process on msg {message_id}"));

        if let Err(source) = self.task.run(message.clone()).await {
            return Err(SqsWorkerError::TaskError { message_id, source });
        }

        // The task succeeded; a failed delete only means the message may be
        // redelivered after its visibility timeout.
        if let Err(err) = self.client.delete_message(&message).await {
            self.logger.error(format_args!(
                "sqsworker : failed to delete msg {message_id}: {err}"
            ));
        }

        self.logger
            .debug(format_args!("sqsworker : completed process on msg {message_id}"));
        Ok(())
    }

    fn handle_error(&self, err: SqsWorkerError) {
        if let Err(dropped) = self.reporter.report(err) {
            self.logger.debug(format_args!(
                "sqsworker : error channel unavailable, dropped error: {dropped}"
            ));
        }
    }

    /// Waits before the next poll. Returns `true` if the stop signal fired.
    async fn idle(&self) -> bool {
        if self.empty_poll_delay.is_zero() {
            tokio::task::yield_now().await;
            return self.stop.is_cancelled();
        }

        tokio::select! {
            biased;
            _ = self.stop.cancelled() => true,
            _ = tokio::time::sleep(self.empty_poll_delay) => false,
        }
    }
}
