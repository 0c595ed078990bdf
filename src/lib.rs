//! # SQS Worker Pool
//!
//! A fixed-size pool of asynchronous workers polling an AWS SQS queue. Each
//! worker receives one message at a time, runs a user-supplied task on it and
//! deletes the message once the task succeeds.
//!
//! ## Features
//!
//! - Fixed number of tokio workers sharing one queue client
//! - Panics inside tasks are recovered and reported as errors
//! - Cancellable receives: stopping the pool abandons in-flight long polls
//! - Best-effort error channel that never blocks a worker
//! - Failed messages are left on the queue for redelivery
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqs_worker_pool::client::ClientParams;
//! use sqs_worker_pool::worker::{WorkersParams, start_workers};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let params = WorkersParams::new(ClientParams::from_env()?, |message: aws_sdk_sqs::types::Message| async move {
//!         println!("Processing message: {:?}", message.body());
//!         Ok(())
//!     })
//!     .with_worker_count(8);
//!
//!     let stop = CancellationToken::new();
//!     let (pool, _errors) = start_workers(params, stop.clone()).await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     pool.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod errors;
pub mod logger;
pub mod worker;
