use std::fmt;

/// Minimal logging capability used by the worker pool.
///
/// Implementations must be safe to share between all workers of a pool.
pub trait Logger: Send + Sync {
    fn info(&self, args: fmt::Arguments<'_>);

    fn debug(&self, args: fmt::Arguments<'_>);

    fn error(&self, args: fmt::Arguments<'_>);
}

/// Default [`Logger`] that forwards to `tracing`.
///
/// Installing a subscriber is left to the application.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(target: "sqs_worker", "{}", args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(target: "sqs_worker", "{}", args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(target: "sqs_worker", "{}", args);
    }
}
