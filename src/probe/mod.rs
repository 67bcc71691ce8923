//! Probe execution: one HTTP round trip per dispatched id.
//!
//! A probe never fails the run. Transport errors are captured as the probe's
//! outcome and flow through the same event path as successes.

mod filter;

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::style::Stylize;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Url};

/// Final classification of a finished probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        status: u16,
        /// Final URL after redirects.
        url: String,
        /// Display text from the JSON filter; empty when no filter is set or
        /// the filter yielded nothing. May be an inline error string.
        payload: String,
    },
    Failure {
        error: String,
    },
}

/// Timing and outcome of one finished probe cycle.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub id: u64,
    pub start: DateTime<Local>,
    /// Wall-clock round-trip time including connection setup, rounded to
    /// millisecond granularity.
    pub duration: Duration,
    pub outcome: Outcome,
}

impl ProbeReport {
    pub fn end(&self) -> DateTime<Local> {
        self.start + chrono::Duration::milliseconds(self.duration.as_millis() as i64)
    }
}

/// Perform one probe against `url` and classify the result.
///
/// Duration is measured around the whole round trip, on error paths too.
pub async fn execute(
    client: &Client,
    method: Method,
    url: Url,
    json_filter: Option<&str>,
    id: u64,
) -> ProbeReport {
    let start = Local::now();
    let started = Instant::now();
    let result = client.request(method, url).send().await;
    let duration = round_to_millis(started.elapsed());

    match result {
        Err(err) => {
            tracing::debug!(id, error = %err, "probe failed");
            ProbeReport {
                id,
                start,
                duration,
                outcome: Outcome::Failure {
                    error: error_chain(&err).red().to_string(),
                },
            }
        }
        Ok(resp) => {
            let status = resp.status().as_u16();
            let final_url = resp.url().to_string();
            let payload = match json_filter {
                Some(expr) => filter_payload(expr, resp).await,
                None => String::new(),
            };
            ProbeReport {
                id,
                start,
                duration,
                outcome: Outcome::Success {
                    status,
                    url: final_url,
                    payload,
                },
            }
        }
    }
}

/// Check the content type, read the body, and hand it to the filter.
/// Consuming (or dropping) the response releases its connection either way.
async fn filter_payload(expr: &str, resp: reqwest::Response) -> String {
    let mime = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !mime.starts_with("application/json") {
        return format!("Invalid content type: {mime}").red().to_string();
    }
    match resp.text().await {
        Ok(body) => filter::apply(expr, &body),
        Err(err) => error_chain(&err).red().to_string(),
    }
}

/// Render an error with its source chain, which is where reqwest keeps the
/// interesting part ("connection refused", certificate errors, ...).
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn round_to_millis(d: Duration) -> Duration {
    Duration::from_millis(((d.as_micros() + 500) / 1000) as u64)
}
