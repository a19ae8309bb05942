// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Severity scale for log messages, aligned with the Google Cloud Logging
/// `LogSeverity` values. Levels are spaced by 100 so intermediate custom
/// values stay meaningfully ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum Severity {
    #[default]
    Default = 0,
    Debug = 100,
    Info = 200,
    Notice = 300,
    Warning = 400,
    Error = 500,
    Critical = 600,
    Alert = 700,
    Emergency = 800,
}

impl Severity {
    /// Canonical name, stable across releases. `Default` renders as `TRACE`.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Notice => "NOTICE",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
            Severity::Alert => "ALERT",
            Severity::Emergency => "EMERGENCY",
            Severity::Default => "TRACE",
        }
    }

    /// Case-insensitive parse of a severity name. `WARNING` and `FATAL` are
    /// accepted as aliases; anything unrecognized falls back to `Default`,
    /// so a bad configuration value never suppresses all output.
    pub fn from_name(name: &str) -> Severity {
        match name.to_uppercase().as_str() {
            "TRACE" => Severity::Default,
            "DEBUG" => Severity::Debug,
            "INFO" => Severity::Info,
            "NOTICE" => Severity::Notice,
            "WARNING" | "WARN" => Severity::Warning,
            "ERROR" => Severity::Error,
            "CRITICAL" | "FATAL" => Severity::Critical,
            "ALERT" => Severity::Alert,
            "EMERGENCY" => Severity::Emergency,
            _ => Severity::Default,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
