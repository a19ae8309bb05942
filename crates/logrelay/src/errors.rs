// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Failure releasing a sink's underlying destination.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("destination io: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure initializing a sink destination while assembling the pipeline.
/// Emission paths never see these; a sink that fails to build is simply not
/// registered.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("create log directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
    #[error("open log file {path}: {source}")]
    OpenFile {
        path: String,
        source: std::io::Error,
    },
    #[error("build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
