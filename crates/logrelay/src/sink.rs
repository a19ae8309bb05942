// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde_json::Value;
use std::io::{self, Write};

use crate::callsite::Callsite;
use crate::errors::SinkError;
use crate::severity::Severity;

/// Capability contract every log backend implements. The dispatch loop owns
/// all registered sinks and is their only caller, so implementations hold
/// whatever state they need without synchronization beyond what their
/// destination itself requires.
///
/// Emit operations never propagate failure to the producer side: anything
/// that goes wrong is reported through the process diagnostics and the
/// message is dropped for that sink only.
#[async_trait]
pub trait Sink: Send {
    /// Delivers a formatted text message.
    async fn emit_text(
        &mut self,
        now: DateTime<Local>,
        severity: Severity,
        callsite: Callsite,
        message: &str,
    );

    /// Delivers a pre-serialized structured payload, forwarded as-is.
    async fn emit_raw(
        &mut self,
        now: DateTime<Local>,
        severity: Severity,
        callsite: Callsite,
        raw: &[u8],
    );

    /// Delivers a structured value the sink serializes itself. Serialization
    /// failure drops the message for this sink.
    async fn emit_value(
        &mut self,
        now: DateTime<Local>,
        severity: Severity,
        callsite: Callsite,
        value: &Value,
    );

    /// Releases the underlying destination. The dispatcher calls this once
    /// during shutdown; repeated calls must be no-ops.
    async fn close(&mut self) -> Result<(), SinkError>;
}

/// Byte destination under the console sink: a writer with an explicit close.
/// The default close is a flush, which is all the process-wide streams need;
/// destinations owning a real handle override it.
pub trait Target: Write + Send {
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl Target for io::Stderr {}
impl Target for io::Stdout {}
