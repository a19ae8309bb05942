// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::panic::Location;

/// Source location of an emission call, with the path stripped down to its
/// final component the way the console header prints it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Callsite {
    pub file: &'static str,
    pub line: u32,
}

impl Callsite {
    /// Placeholder for contexts with no recoverable location.
    pub const UNKNOWN: Callsite = Callsite { file: "???", line: 0 };

    /// Captures the location of the nearest caller outside `#[track_caller]`
    /// frames. Every public emission wrapper carries `#[track_caller]`, so
    /// the location recorded on a message is the application call site, not
    /// pipeline plumbing.
    #[track_caller]
    pub fn caller() -> Callsite {
        let location = Location::caller();
        Callsite {
            file: short_file(location.file()),
            line: location.line(),
        }
    }
}

impl fmt::Display for Callsite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Strips the directory part of a source path, keeping the file name.
fn short_file(file: &'static str) -> &'static str {
    match file.rfind(['/', '\\']) {
        Some(idx) => &file[idx + 1..],
        None => file,
    }
}
