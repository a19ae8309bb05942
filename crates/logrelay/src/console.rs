// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde_json::Value;
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::{debug, error};

use crate::callsite::Callsite;
use crate::errors::SinkError;
use crate::severity::Severity;
use crate::sink::{Sink, Target};

/// Sink that renders `timestamp file:line: [SEVERITY] message` lines into a
/// byte target. The target may be a process-wide stream shared with other
/// writers or a rotating file writer, so writes go through a lock.
pub struct ConsoleSink {
    threshold: Severity,
    out: Mutex<Box<dyn Target>>,
}

impl ConsoleSink {
    pub fn new(threshold: Severity, out: Box<dyn Target>) -> ConsoleSink {
        ConsoleSink {
            threshold,
            out: Mutex::new(out),
        }
    }

    /// The default root sink: stderr, filtered at `threshold`.
    pub fn stderr(threshold: Severity) -> ConsoleSink {
        ConsoleSink::new(threshold, Box::new(io::stderr()))
    }

    fn write_line(
        &mut self,
        now: DateTime<Local>,
        severity: Severity,
        callsite: Callsite,
        message: &str,
    ) {
        let mut line = format!(
            "{} {}: [{}] {}",
            now.format("%Y-%m-%d %H:%M:%S%.6f"),
            callsite,
            severity,
            message
        );
        if !line.ends_with('\n') {
            line.push('\n');
        }

        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = out.write_all(line.as_bytes()) {
            error!("console sink write failed: {err}");
        }
    }
}

#[async_trait]
impl Sink for ConsoleSink {
    async fn emit_text(
        &mut self,
        now: DateTime<Local>,
        severity: Severity,
        callsite: Callsite,
        message: &str,
    ) {
        if severity >= self.threshold {
            self.write_line(now, severity, callsite, message);
        }
    }

    async fn emit_raw(
        &mut self,
        now: DateTime<Local>,
        severity: Severity,
        callsite: Callsite,
        raw: &[u8],
    ) {
        if severity >= self.threshold {
            let message = String::from_utf8_lossy(raw);
            self.write_line(now, severity, callsite, &message);
        }
    }

    async fn emit_value(
        &mut self,
        now: DateTime<Local>,
        severity: Severity,
        callsite: Callsite,
        value: &Value,
    ) {
        if severity < self.threshold {
            return;
        }
        match serde_json::to_string(value) {
            Ok(rendered) => self.write_line(now, severity, callsite, &rendered),
            Err(err) => debug!("dropping unserializable payload: {err}"),
        }
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        out.close().map_err(SinkError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::io::Write;
    use std::sync::Arc;

    /// Shared in-memory target so tests can read back what the sink wrote.
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Target for SharedBuf {}

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, 8, 9, 10).unwrap()
    }

    fn callsite() -> Callsite {
        Callsite {
            file: "main.rs",
            line: 42,
        }
    }

    #[tokio::test]
    async fn formats_the_full_header() {
        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::new(Severity::Default, Box::new(buf.clone()));

        sink.emit_text(fixed_now(), Severity::Info, callsite(), "hello")
            .await;

        assert_eq!(
            buf.contents(),
            "2024-01-15 08:09:10.000000 main.rs:42: [INFO] hello\n"
        );
    }

    #[tokio::test]
    async fn does_not_double_the_trailing_newline() {
        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::new(Severity::Default, Box::new(buf.clone()));

        sink.emit_text(fixed_now(), Severity::Warning, callsite(), "already terminated\n")
            .await;

        assert!(buf.contents().ends_with("[WARN] already terminated\n"));
        assert!(!buf.contents().ends_with("\n\n"));
    }

    #[tokio::test]
    async fn filters_every_emit_shape_below_the_threshold() {
        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::new(Severity::Info, Box::new(buf.clone()));

        sink.emit_text(fixed_now(), Severity::Debug, callsite(), "text")
            .await;
        sink.emit_raw(fixed_now(), Severity::Default, callsite(), b"{\"raw\":1}")
            .await;
        sink.emit_value(fixed_now(), Severity::Debug, callsite(), &json!({"v": 1}))
            .await;
        assert_eq!(buf.contents(), "");

        sink.emit_text(fixed_now(), Severity::Info, callsite(), "visible")
            .await;
        assert!(buf.contents().ends_with("[INFO] visible\n"));
    }

    #[tokio::test]
    async fn severities_at_or_above_the_threshold_pass() {
        let all = [
            Severity::Default,
            Severity::Debug,
            Severity::Info,
            Severity::Notice,
            Severity::Warning,
            Severity::Error,
            Severity::Critical,
            Severity::Alert,
            Severity::Emergency,
        ];

        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::new(Severity::Warning, Box::new(buf.clone()));
        for severity in all {
            sink.emit_text(fixed_now(), severity, callsite(), severity.as_str())
                .await;
        }

        let contents = buf.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 5);
        for (line, expected) in lines.iter().zip(["WARN", "ERROR", "CRITICAL", "ALERT", "EMERGENCY"]) {
            assert!(line.ends_with(&format!("[{expected}] {expected}")), "line {line}");
        }
    }

    #[tokio::test]
    async fn raw_payloads_are_written_verbatim() {
        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::new(Severity::Default, Box::new(buf.clone()));

        sink.emit_raw(fixed_now(), Severity::Info, callsite(), b"{\"code\":0}")
            .await;

        assert!(buf.contents().ends_with("[INFO] {\"code\":0}\n"));
    }

    #[tokio::test]
    async fn values_are_serialized_to_json_text() {
        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::new(Severity::Default, Box::new(buf.clone()));

        sink.emit_value(fixed_now(), Severity::Error, callsite(), &json!({"code": 7}))
            .await;

        assert!(buf.contents().ends_with("[ERROR] {\"code\":7}\n"));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::new(Severity::Default, Box::new(buf));

        assert!(sink.close().await.is_ok());
        assert!(sink.close().await.is_ok());
    }
}
