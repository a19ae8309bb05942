// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Formatted emission, one macro per severity level:
//!
//! ```ignore
//! logrelay::info!(handle, "listening on {}", port).await;
//! ```
//!
//! Each macro formats its arguments and forwards to the matching method on
//! [`LogHandle`](crate::LogHandle), so the recorded callsite is the macro
//! invocation and the returned future enqueues the message.

#[macro_export]
macro_rules! trace {
    ($handle:expr, $($arg:tt)*) => {
        $handle.trace(::std::format!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug {
    ($handle:expr, $($arg:tt)*) => {
        $handle.debug(::std::format!($($arg)*))
    };
}

#[macro_export]
macro_rules! info {
    ($handle:expr, $($arg:tt)*) => {
        $handle.info(::std::format!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($handle:expr, $($arg:tt)*) => {
        $handle.warn(::std::format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($handle:expr, $($arg:tt)*) => {
        $handle.error(::std::format!($($arg)*))
    };
}

#[macro_export]
macro_rules! fatal {
    ($handle:expr, $($arg:tt)*) => {
        $handle.fatal(::std::format!($($arg)*))
    };
}

#[macro_export]
macro_rules! alert {
    ($handle:expr, $($arg:tt)*) => {
        $handle.alert(::std::format!($($arg)*))
    };
}

#[macro_export]
macro_rules! emergency {
    ($handle:expr, $($arg:tt)*) => {
        $handle.emergency(::std::format!($($arg)*))
    };
}
