// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use crate::callsite::Callsite;
use crate::errors::{BuildError, SinkError};
use crate::severity::Severity;
use crate::sink::Sink;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const API_KEY_HEADER: &str = "DD-API-KEY";

/// Entry shape forwarded to the remote intake, one request per message.
#[derive(Serialize)]
struct RemoteEntry<'a> {
    timestamp: DateTime<Local>,
    severity: &'a str,
    name: &'a str,
    file: &'a str,
    line: u32,
    message: Value,
}

/// Thin adapter forwarding each dispatched message to an HTTP log intake.
/// Delivery is fire-and-forget: send failures are diagnosed and dropped,
/// never retried, and nothing is buffered across messages.
pub struct RemoteSink {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    name: String,
    closed: bool,
}

impl RemoteSink {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        name: impl Into<String>,
    ) -> Result<RemoteSink, BuildError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(RemoteSink {
            client,
            endpoint: endpoint.into(),
            api_key,
            name: name.into(),
            closed: false,
        })
    }

    async fn forward(
        &self,
        now: DateTime<Local>,
        severity: Severity,
        callsite: Callsite,
        message: Value,
    ) {
        if self.closed {
            return;
        }

        let entry = RemoteEntry {
            timestamp: now,
            severity: severity.as_str(),
            name: &self.name,
            file: callsite.file,
            line: callsite.line,
            message,
        };

        let mut request = self.client.post(&self.endpoint).json(&entry);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        match request.send().await {
            Ok(response) if !response.status().is_success() => {
                error!("remote log intake returned {}", response.status());
            }
            Ok(_) => {}
            Err(err) => error!("forward log entry: {err}"),
        }
    }
}

#[async_trait]
impl Sink for RemoteSink {
    async fn emit_text(
        &mut self,
        now: DateTime<Local>,
        severity: Severity,
        callsite: Callsite,
        message: &str,
    ) {
        self.forward(now, severity, callsite, Value::String(message.to_owned()))
            .await;
    }

    async fn emit_raw(
        &mut self,
        now: DateTime<Local>,
        severity: Severity,
        callsite: Callsite,
        raw: &[u8],
    ) {
        // Valid JSON is embedded structurally; anything else rides along as
        // a string.
        let message = serde_json::from_slice::<Value>(raw)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(raw).into_owned()));
        self.forward(now, severity, callsite, message).await;
    }

    async fn emit_value(
        &mut self,
        now: DateTime<Local>,
        severity: Severity,
        callsite: Callsite,
        value: &Value,
    ) {
        self.forward(now, severity, callsite, value.clone()).await;
    }

    /// Guarded to take effect at most once; later messages are dropped
    /// rather than sent over a closed adapter.
    async fn close(&mut self) -> Result<(), SinkError> {
        if !self.closed {
            self.closed = true;
            debug!("remote log sink closed");
        }
        Ok(())
    }
}
