// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use tracing::error;

use crate::console::ConsoleSink;
use crate::dispatcher::{DispatcherService, LogHandle};
use crate::remote::RemoteSink;
use crate::rolling::RollingWriter;
use crate::severity::Severity;

/// Pipeline configuration resolved from the environment. Every key is
/// optional; a missing group leaves that sink unregistered, which is never
/// an error.
#[derive(Debug, Default)]
pub struct Config {
    /// `LOG_ROOT_LEVEL` — console sink threshold. Missing or unrecognized
    /// values resolve to the lowest level.
    pub root_level: Severity,
    /// `LOG_ROLLING_LEVEL` — enables the rolling file sink when present and
    /// non-empty.
    pub rolling_level: Option<Severity>,
    /// `LOG_ROLLING_PATH` — rolling file directory, `.` when unset.
    pub rolling_path: String,
    /// `LOG_ROLLING_PREFIX` — file name prefix, empty when unset.
    pub rolling_prefix: String,
    /// `LOG_REMOTE_URL` — enables the remote sink when present.
    pub remote_url: Option<String>,
    /// `LOG_REMOTE_API_KEY` — intake credential, sent as a header when set.
    pub remote_api_key: Option<String>,
    /// `LOG_REMOTE_NAME` — logical stream name attached to remote entries.
    pub remote_name: String,
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            root_level: env::var("LOG_ROOT_LEVEL")
                .map(|v| Severity::from_name(&v))
                .unwrap_or_default(),
            rolling_level: env::var("LOG_ROLLING_LEVEL")
                .ok()
                .filter(|v| !v.is_empty())
                .map(|v| Severity::from_name(&v)),
            rolling_path: env::var("LOG_ROLLING_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| ".".to_string()),
            rolling_prefix: env::var("LOG_ROLLING_PREFIX").unwrap_or_default(),
            remote_url: env::var("LOG_REMOTE_URL").ok().filter(|v| !v.is_empty()),
            remote_api_key: env::var("LOG_REMOTE_API_KEY").ok(),
            remote_name: env::var("LOG_REMOTE_NAME").unwrap_or_else(|_| "default".to_string()),
        }
    }
}

/// Builds a dispatcher with the sinks the configuration enables, registered
/// in the fixed order console, rolling file, remote. A sink whose
/// destination cannot be initialized is skipped with a diagnostic. The
/// caller spawns `service.run()` and holds the single handle.
pub fn assemble(config: &Config) -> (DispatcherService, LogHandle) {
    let (mut service, handle) = DispatcherService::new();

    service.register(Box::new(ConsoleSink::stderr(config.root_level)));

    if let Some(level) = config.rolling_level {
        match RollingWriter::new(&config.rolling_path, &config.rolling_prefix) {
            Ok(writer) => {
                service.register(Box::new(ConsoleSink::new(level, Box::new(writer))));
            }
            Err(err) => error!("rolling log sink disabled: {err}"),
        }
    }

    if let Some(url) = &config.remote_url {
        match RemoteSink::new(
            url.clone(),
            config.remote_api_key.clone(),
            config.remote_name.clone(),
        ) {
            Ok(sink) => service.register(Box::new(sink)),
            Err(err) => error!("remote log sink disabled: {err}"),
        }
    }

    (service, handle)
}
