// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::Local;
use std::io::Write;
use std::sync::Mutex;

use crate::severity::Severity;

/// Minimal synchronous leveled logger: one mutex-guarded writer, no queue,
/// no sinks, no callsites. Unrelated to the pipeline; kept for callers that
/// want direct, ordered writes without a background task.
pub struct SimpleLogger<W: Write + Send> {
    level: Severity,
    out: Mutex<W>,
}

impl<W: Write + Send> SimpleLogger<W> {
    pub fn new(level: Severity, out: W) -> SimpleLogger<W> {
        SimpleLogger {
            level,
            out: Mutex::new(out),
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(Severity::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }

    pub fn log(&self, severity: Severity, message: &str) {
        if severity < self.level {
            return;
        }

        let line = format!(
            "{} [{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
            severity,
            message
        );
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = out.write_all(line.as_bytes());
    }

    /// Hands back the writer, flushing what it can.
    pub fn into_inner(self) -> W {
        let mut out = match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = out.flush();
        out
    }
}
