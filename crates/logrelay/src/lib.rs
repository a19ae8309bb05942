// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Asynchronous fan-out logging pipeline: leveled emission into a bounded
//! queue, one dispatcher task multicasting every message to the registered
//! sinks (console, daily-rotating file, remote intake), each filtering by
//! its own severity floor.
//!
//! ```ignore
//! let (service, handle) = logrelay::assemble(&logrelay::Config::from_env());
//! tokio::spawn(service.run());
//!
//! handle.info("ready").await;
//! logrelay::warn!(handle, "queue depth {}", depth).await;
//!
//! handle.shutdown(Duration::from_secs(1)).await;
//! ```

pub mod callsite;
pub mod config;
pub mod console;
pub mod dispatcher;
mod errors;
mod macros;
pub mod message;
pub mod remote;
pub mod rolling;
pub mod severity;
pub mod simple;
pub mod sink;

pub use callsite::Callsite;
pub use config::{assemble, Config};
pub use console::ConsoleSink;
pub use dispatcher::{DispatchCommand, DispatcherService, LogHandle, DEFAULT_QUEUE_CAPACITY};
pub use errors::{BuildError, SinkError};
pub use message::{LogMessage, Payload};
pub use remote::RemoteSink;
pub use rolling::RollingWriter;
pub use severity::Severity;
pub use simple::SimpleLogger;
pub use sink::{Sink, Target};
