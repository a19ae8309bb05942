// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::callsite::Callsite;
use crate::severity::Severity;

/// One enqueued log entry. Immutable once constructed; consumed exactly once
/// by the dispatch loop.
#[derive(Debug)]
pub struct LogMessage {
    pub now: DateTime<Local>,
    pub severity: Severity,
    pub callsite: Callsite,
    pub payload: Payload,
}

/// The payload kinds the dispatcher multicasts. Matched explicitly at
/// dispatch time; each case maps to one emit operation on the sink contract.
#[derive(Debug)]
pub enum Payload {
    /// Formatted text.
    Text(String),
    /// Pre-serialized structured bytes, forwarded untouched.
    Raw(Vec<u8>),
    /// Structured value, rendered by each sink at dispatch time.
    Value(Value),
}

impl LogMessage {
    /// Stamps the message with the current time; emission wrappers call this
    /// in their synchronous prelude, so the timestamp reflects the emission
    /// call even when the enqueue itself has to wait for queue space.
    pub fn new(severity: Severity, callsite: Callsite, payload: Payload) -> LogMessage {
        LogMessage {
            now: Local::now(),
            severity,
            callsite,
            payload,
        }
    }
}
