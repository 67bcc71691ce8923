//! htprobe - an interactive latency probe for HTTP endpoints.
//!
//! Sends requests to a single target on a fixed interval and renders an
//! ordered, live-updating log of per-request timing and outcome. The full
//! history is flushed to stdout once the run ends.

mod config;
mod model;
mod probe;
mod render;
mod scheduler;
#[cfg(test)]
mod testutil;
mod ui;

use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Options;
use model::Model;
use scheduler::Plan;

#[derive(Error, Debug)]
enum AppError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("{0}")]
    Request(reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    // Logs go to stderr and stay silent unless RUST_LOG is set, so the live
    // display on stdout is never interleaved with log lines.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let opts = Options::parse();

    let url =
        reqwest::Url::parse(&opts.url).map_err(|e| AppError::InvalidUrl(e.to_string()))?;
    let method = reqwest::Method::from_bytes(opts.method.as_bytes())
        .map_err(|_| AppError::InvalidMethod(opts.method.clone()))?;

    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(opts.insecure)
        .build()
        .map_err(AppError::Request)?;

    // Surface malformed request construction before any probing begins.
    client
        .request(method.clone(), url.clone())
        .build()
        .map_err(AppError::Request)?;

    println!("{} {} [{}ms]\n", method, url, opts.interval);

    let plan = Plan {
        method,
        url,
        interval: Duration::from_millis(opts.interval),
        limit: opts.limit,
        json_filter: opts.json,
    };

    let (tx, mut rx) = mpsc::channel(256);
    tokio::spawn(scheduler::run(client, plan, tx));

    let mut model = Model::new(opts.pager);
    ui::run(&mut model, &mut rx).await?;

    // Full history, unwrapped, in dispatch order.
    for line in render::lines(&model, None) {
        println!("{line}");
    }
    Ok(())
}
