#![allow(dead_code)]

use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_sqs::types::Message;
use sqs_worker_pool::client::{ClientParams, QueueClient};
use sqs_worker_pool::errors::SqsWorkerError;
use sqs_worker_pool::logger::Logger;

pub const QUEUE_URL: &str = "https://sqs.eu-west-1.amazonaws.com/000000000000/test-queue";

/// Simulated long-poll duration of an empty receive.
const EMPTY_POLL_LATENCY: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubMode {
    Normal,
    FailDeletes,
    FailReceives,
    /// Receives never complete.
    Hang,
}

/// In-memory queue behaving like SQS for a single consumer group.
pub struct StubQueue {
    mode: StubMode,
    pending: Mutex<VecDeque<Message>>,
    delete_calls: Mutex<Vec<String>>,
    receive_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl StubQueue {
    pub fn new(mode: StubMode) -> Self {
        StubQueue {
            mode,
            pending: Mutex::new(VecDeque::new()),
            delete_calls: Mutex::new(Vec::new()),
            receive_calls: AtomicUsize::new(0),
            next_id: AtomicUsize::new(1),
        }
    }

    /// Seeds `count` messages with ids (and bodies) "1" to "count".
    pub async fn with_messages(mode: StubMode, count: usize) -> Self {
        let queue = StubQueue::new(mode);
        for i in 1..=count {
            queue.send_message(&i.to_string()).await.unwrap();
        }
        queue
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    pub fn receive_calls(&self) -> usize {
        self.receive_calls.load(Ordering::SeqCst)
    }

    /// Ids passed to `delete_message`, sorted numerically.
    pub fn deleted_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self
            .delete_calls
            .lock()
            .unwrap()
            .iter()
            .map(|id| id.parse().unwrap())
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl QueueClient for StubQueue {
    async fn receive_messages(
        &self,
        max_received_messages: i32,
    ) -> Result<Vec<Message>, SqsWorkerError> {
        self.receive_calls.fetch_add(1, Ordering::SeqCst);

        match self.mode {
            StubMode::Hang => std::future::pending().await,
            StubMode::FailReceives => {
                tokio::time::sleep(EMPTY_POLL_LATENCY).await;
                return Err(SqsWorkerError::ReceiveError("stub receive failure".to_string()));
            }
            StubMode::Normal | StubMode::FailDeletes => {}
        }

        let batch: Vec<Message> = {
            let mut pending = self.pending.lock().unwrap();
            (0..max_received_messages)
                .filter_map(|_| pending.pop_front())
                .collect()
        };

        if batch.is_empty() {
            tokio::time::sleep(EMPTY_POLL_LATENCY).await;
        }
        Ok(batch)
    }

    async fn delete_message(&self, message: &Message) -> Result<(), SqsWorkerError> {
        let message_id = message.message_id().unwrap_or_default().to_string();
        self.delete_calls.lock().unwrap().push(message_id.clone());

        if self.mode == StubMode::FailDeletes {
            return Err(SqsWorkerError::DeleteError {
                message_id,
                reason: "stub delete failure".to_string(),
            });
        }
        Ok(())
    }

    async fn send_message(&self, body: &str) -> Result<Option<String>, SqsWorkerError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let message = Message::builder()
            .message_id(&id)
            .receipt_handle(format!("rh-{id}"))
            .body(body)
            .build();
        self.pending.lock().unwrap().push_back(message);
        Ok(Some(id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Debug,
    Error,
}

#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn lines_at(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line.clone())
            .collect()
    }

    fn record(&self, level: Level, args: fmt::Arguments<'_>) {
        self.lines.lock().unwrap().push((level, args.to_string()));
    }
}

impl Logger for RecordingLogger {
    fn info(&self, args: fmt::Arguments<'_>) {
        self.record(Level::Info, args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.record(Level::Debug, args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        self.record(Level::Error, args);
    }
}

pub fn client_params() -> ClientParams {
    ClientParams::new("eu-west-1", QUEUE_URL)
}

/// Polls `condition` until it holds or `timeout` elapses.
pub async fn eventually<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
