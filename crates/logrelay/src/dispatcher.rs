// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use futures::FutureExt;
use serde::Serialize;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::callsite::Callsite;
use crate::message::{LogMessage, Payload};
use crate::severity::Severity;
use crate::sink::Sink;

/// Default bound of the message queue. Producers block once this many
/// messages are waiting on the dispatcher.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Commands consumed by the dispatch loop. Registration and shutdown travel
/// the same queue as messages, so they are ordered after every emission that
/// preceded them.
pub enum DispatchCommand {
    Log(LogMessage),
    Register(Box<dyn Sink>),
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable producer side of the pipeline: the leveled emission API plus
/// registration and shutdown.
#[derive(Clone)]
pub struct LogHandle {
    tx: mpsc::Sender<DispatchCommand>,
}

/// Single-consumer dispatch engine owning the sink registry. Sinks are moved
/// into the service, so nothing can reach them except the dispatch loop.
pub struct DispatcherService {
    rx: mpsc::Receiver<DispatchCommand>,
    sinks: Vec<Box<dyn Sink>>,
}

impl DispatcherService {
    /// Creates the service/handle pair with the default queue bound. Spawn
    /// `service.run()` once at process initialization and thread the handle
    /// through to everything that logs.
    pub fn new() -> (DispatcherService, LogHandle) {
        DispatcherService::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> (DispatcherService, LogHandle) {
        let (tx, rx) = mpsc::channel(capacity);
        let service = DispatcherService {
            rx,
            sinks: Vec::new(),
        };
        (service, LogHandle { tx })
    }

    /// Registers a sink before the service is spawned. Once it is running,
    /// use [`LogHandle::register`] instead.
    pub fn register(&mut self, sink: Box<dyn Sink>) {
        self.sinks.push(sink);
    }

    /// Number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub async fn run(mut self) {
        debug!("log dispatcher started");

        while let Some(command) = self.rx.recv().await {
            match command {
                DispatchCommand::Log(message) => self.multicast(message).await,
                DispatchCommand::Register(sink) => self.sinks.push(sink),
                DispatchCommand::Shutdown(ack) => {
                    self.close_sinks().await;
                    if ack.send(()).is_err() {
                        debug!("shutdown requester went away");
                    }
                    break;
                }
            }
        }

        debug!("log dispatcher stopped");
    }

    /// Delivers one message to every sink in registration order. Each sink
    /// invocation is isolated: write errors stay inside the sink, and a
    /// panic is caught here, so one misbehaving backend cannot take down
    /// delivery to the rest.
    async fn multicast(&mut self, message: LogMessage) {
        let LogMessage {
            now,
            severity,
            callsite,
            payload,
        } = message;

        for sink in &mut self.sinks {
            let delivery = async {
                match &payload {
                    Payload::Text(text) => sink.emit_text(now, severity, callsite, text).await,
                    Payload::Raw(raw) => sink.emit_raw(now, severity, callsite, raw).await,
                    Payload::Value(value) => sink.emit_value(now, severity, callsite, value).await,
                }
            };
            if AssertUnwindSafe(delivery).catch_unwind().await.is_err() {
                error!("log sink panicked; message dropped for that sink");
            }
        }
    }

    async fn close_sinks(&mut self) {
        for sink in &mut self.sinks {
            if let Err(err) = sink.close().await {
                error!("closing log sink: {err}");
            }
        }
    }
}

impl LogHandle {
    /// Registers a sink on a running dispatcher. The registration is ordered
    /// after everything already enqueued.
    pub async fn register(&self, sink: Box<dyn Sink>) {
        self.send(DispatchCommand::Register(sink)).await;
    }

    #[track_caller]
    pub fn trace<'a>(&'a self, message: impl Into<String>) -> impl Future<Output = ()> + 'a {
        self.emit(Severity::Default, Payload::Text(message.into()), Callsite::caller())
    }

    #[track_caller]
    pub fn debug<'a>(&'a self, message: impl Into<String>) -> impl Future<Output = ()> + 'a {
        self.emit(Severity::Debug, Payload::Text(message.into()), Callsite::caller())
    }

    #[track_caller]
    pub fn info<'a>(&'a self, message: impl Into<String>) -> impl Future<Output = ()> + 'a {
        self.emit(Severity::Info, Payload::Text(message.into()), Callsite::caller())
    }

    #[track_caller]
    pub fn warn<'a>(&'a self, message: impl Into<String>) -> impl Future<Output = ()> + 'a {
        self.emit(Severity::Warning, Payload::Text(message.into()), Callsite::caller())
    }

    #[track_caller]
    pub fn error<'a>(&'a self, message: impl Into<String>) -> impl Future<Output = ()> + 'a {
        self.emit(Severity::Error, Payload::Text(message.into()), Callsite::caller())
    }

    /// Logged at `CRITICAL`; the pipeline itself never terminates the
    /// process.
    #[track_caller]
    pub fn fatal<'a>(&'a self, message: impl Into<String>) -> impl Future<Output = ()> + 'a {
        self.emit(Severity::Critical, Payload::Text(message.into()), Callsite::caller())
    }

    #[track_caller]
    pub fn alert<'a>(&'a self, message: impl Into<String>) -> impl Future<Output = ()> + 'a {
        self.emit(Severity::Alert, Payload::Text(message.into()), Callsite::caller())
    }

    #[track_caller]
    pub fn emergency<'a>(&'a self, message: impl Into<String>) -> impl Future<Output = ()> + 'a {
        self.emit(Severity::Emergency, Payload::Text(message.into()), Callsite::caller())
    }

    /// Pre-serialized structured payload at `TRACE`.
    #[track_caller]
    pub fn trace_raw<'a>(&'a self, raw: Vec<u8>) -> impl Future<Output = ()> + 'a {
        self.emit(Severity::Default, Payload::Raw(raw), Callsite::caller())
    }

    /// Pre-serialized structured payload at `DEBUG`.
    #[track_caller]
    pub fn debug_raw<'a>(&'a self, raw: Vec<u8>) -> impl Future<Output = ()> + 'a {
        self.emit(Severity::Debug, Payload::Raw(raw), Callsite::caller())
    }

    /// Arbitrary serializable payload at any severity. A value that cannot
    /// be converted is dropped before it is enqueued.
    #[track_caller]
    pub fn log_value<'a, T: Serialize>(
        &'a self,
        severity: Severity,
        value: &T,
    ) -> impl Future<Output = ()> + 'a {
        let callsite = Callsite::caller();
        let converted = serde_json::to_value(value);
        async move {
            match converted {
                Ok(value) => {
                    let message = LogMessage::new(severity, callsite, Payload::Value(value));
                    self.send(DispatchCommand::Log(message)).await;
                }
                Err(err) => debug!("dropping unserializable log value: {err}"),
            }
        }
    }

    /// Shared emit path. The callsite is captured by the `#[track_caller]`
    /// wrappers above and threaded through explicitly; the message is
    /// stamped here, in the synchronous part of the call, so a wait for
    /// queue space never skews the timestamp.
    fn emit<'a>(
        &'a self,
        severity: Severity,
        payload: Payload,
        callsite: Callsite,
    ) -> impl Future<Output = ()> + 'a {
        let message = LogMessage::new(severity, callsite, payload);
        async move { self.send(DispatchCommand::Log(message)).await }
    }

    async fn send(&self, command: DispatchCommand) {
        // A closed queue means the pipeline has shut down; emissions after
        // that point are discarded.
        if self.tx.send(command).await.is_err() {
            debug!("log pipeline is shut down; message discarded");
        }
    }

    /// Drains and closes the pipeline: sleeps the grace period so in-flight
    /// producers finish enqueuing, then closes every sink in registration
    /// order. Everything enqueued before this call is delivered before it
    /// returns. The queue cannot be reopened; a second shutdown is a no-op.
    pub async fn shutdown(&self, grace: Duration) {
        if !grace.is_zero() {
            tokio::time::sleep(grace).await;
        }

        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(DispatchCommand::Shutdown(ack_tx)).await.is_err() {
            return; // already shut down
        }
        if ack_rx.await.is_err() {
            debug!("dispatcher stopped before acknowledging shutdown");
        }
    }
}
