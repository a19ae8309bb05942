// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use serde::Serialize;
use std::env;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use logrelay::{assemble, Config, LogHandle, Severity};

#[derive(Serialize)]
struct Receipt {
    code: i32,
    msg: String,
}

#[tokio::main]
pub async fn main() {
    let diag_level = env::var("LOG_DIAG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    let env_filter = format!("hyper=off,reqwest=off,{}", diag_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Diagnostics subsystem enabled");

    let config = Config::from_env();
    let (service, handle) = assemble(&config);
    tokio::spawn(service.run());

    handle.debug("pipeline demo starting").await;
    logrelay::debug!(handle, "debug aa: {}", "test").await;

    handle.fatal("simulated failure").await;
    logrelay::fatal!(handle, "simulated failure: {}", "test").await;

    emit_from_a_helper(&handle).await;

    handle
        .log_value(
            Severity::Info,
            &Receipt {
                code: 0,
                msg: "ok".to_string(),
            },
        )
        .await;
    handle.debug_raw(br#"{"code":0,"msg":"raw"}"#.to_vec()).await;

    handle.shutdown(Duration::from_secs(1)).await;
}

async fn emit_from_a_helper(handle: &LogHandle) {
    handle.info("A").await;
}
