use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::errors::SqsWorkerError;

/// Receiving side of the pool's error channel.
pub type ErrorReceiver = mpsc::Receiver<SqsWorkerError>;

/// Best-effort error reporting shared by all workers of a pool.
///
/// Reporting never waits: when the channel is full, or its receiver is gone,
/// the error is dropped and counted.
#[derive(Debug, Clone)]
pub(crate) struct ErrorReporter {
    tx: mpsc::Sender<SqsWorkerError>,
    dropped: Arc<AtomicU64>,
}

impl ErrorReporter {
    pub(crate) fn channel(capacity: usize) -> (Self, ErrorReceiver) {
        let (tx, rx) = mpsc::channel(capacity);
        let reporter = ErrorReporter {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (reporter, rx)
    }

    /// Hands the error back when it was dropped.
    pub(crate) fn report(&self, err: SqsWorkerError) -> Result<(), SqsWorkerError> {
        match self.tx.try_send(err) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(err)) | Err(TrySendError::Closed(err)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Err(err)
            }
        }
    }

    pub(crate) fn dropped_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drops_when_full() {
        let (reporter, mut rx) = ErrorReporter::channel(1);
        let dropped = reporter.dropped_counter();

        assert!(reporter.report(SqsWorkerError::ReceiveError("first".into())).is_ok());
        let dropped_err = reporter
            .report(SqsWorkerError::ReceiveError("second".into()))
            .unwrap_err();
        assert_eq!(dropped_err.to_string(), "failed to receive messages: second");
        assert_eq!(dropped.load(Ordering::Relaxed), 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.to_string(), "failed to receive messages: first");

        assert!(reporter.report(SqsWorkerError::ReceiveError("third".into())).is_ok());
        assert_eq!(dropped.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn drops_when_receiver_is_gone() {
        let (reporter, rx) = ErrorReporter::channel(4);
        drop(rx);

        assert!(reporter.report(SqsWorkerError::ReceiveError("lost".into())).is_err());
        assert_eq!(reporter.dropped_counter().load(Ordering::Relaxed), 1);
    }
}
