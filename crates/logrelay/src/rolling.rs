// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Datelike, Local};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::error;

use crate::errors::BuildError;
use crate::sink::Target;

/// Writer backing the rolling file sink: one file per calendar day per
/// (directory, prefix) pair, named `<prefix><YYYY><MM><DD>.log` and opened
/// append-create, so re-running against the same directory and prefix on the
/// same day appends to the same file.
///
/// The handle is swapped when a write's calendar date no longer matches the
/// day the current file was opened for. The old handle is always closed
/// before the new one opens.
pub struct RollingWriter {
    day_start: DateTime<Local>,
    file: Option<File>,
    dir: PathBuf,
    prefix: String,
}

impl RollingWriter {
    /// Creates the target directory (with parents) and opens today's file.
    /// Failure here means the caller must not register the sink.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<RollingWriter, BuildError> {
        let dir = dir.into();
        let prefix = prefix.into();

        fs::create_dir_all(&dir).map_err(|source| BuildError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;

        let now = Local::now();
        let path = rolling_file_name(&dir, &prefix, now);
        let file = open_append(&path).map_err(|source| BuildError::OpenFile {
            path: path.display().to_string(),
            source,
        })?;

        Ok(RollingWriter {
            day_start: now,
            file: Some(file),
            dir,
            prefix,
        })
    }

    /// Swaps the handle for `now`'s file. The day start advances even when
    /// the open fails, so the next attempt comes with the next date change
    /// and writes until then fail with no destination.
    fn rotate(&mut self, now: DateTime<Local>) {
        self.file = None;
        self.day_start = now;

        let path = rolling_file_name(&self.dir, &self.prefix, now);
        match open_append(&path) {
            Ok(file) => self.file = Some(file),
            Err(err) => error!("open log file {}: {err}", path.display()),
        }
    }

    /// Write with an explicit timestamp driving the rotation decision.
    pub(crate) fn write_at(&mut self, now: DateTime<Local>, buf: &[u8]) -> io::Result<usize> {
        if self.day_start.date_naive() != now.date_naive() {
            self.rotate(now);
        }
        match self.file.as_mut() {
            Some(file) => file.write(buf),
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "no open log file")),
        }
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_at(Local::now(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Target for RollingWriter {
    fn close(&mut self) -> io::Result<()> {
        // Dropping the handle closes it; repeated closes are no-ops.
        self.file = None;
        Ok(())
    }
}

/// `<dir>/<prefix><YYYY><MM><DD>.log`
pub(crate) fn rolling_file_name(dir: &Path, prefix: &str, day: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "{}{}{:02}{:02}.log",
        prefix,
        day.year(),
        day.month(),
        day.day()
    ))
}

fn open_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options.open(path)
}
