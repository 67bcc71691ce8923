//! Dispatch loop: assigns probe ids on a fixed tick and drains in-flight
//! work before signaling end-of-run.

use std::time::Duration;

use reqwest::{Client, Method, Url};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::model::Event;
use crate::probe;

/// What to probe and how often.
#[derive(Debug, Clone)]
pub struct Plan {
    pub method: Method,
    pub url: Url,
    pub interval: Duration,
    /// Total probes to dispatch; 0 means unlimited.
    pub limit: u64,
    pub json_filter: Option<String>,
}

/// Run the dispatch loop until the limit is reached or the consumer hangs up.
///
/// Each tick assigns the next id, announces it as pending, and spawns an
/// independent probe task; in-flight probes are deliberately unbounded, so a
/// slow target never delays the schedule. After the last dispatch all
/// outstanding probes are awaited before [`Event::Drained`] is sent. The
/// channel is FIFO, so every completion is queued ahead of the drain signal
/// and none is lost on the graceful path.
pub async fn run(client: Client, plan: Plan, tx: mpsc::Sender<Event>) {
    let mut ticker = tokio::time::interval(plan.interval);
    // The first tick completes immediately; consume it here so probe 1 fires
    // right away and probe n at (n-1) * interval.
    ticker.tick().await;

    let mut inflight = JoinSet::new();
    let mut id: u64 = 1;

    loop {
        if plan.limit != 0 && id > plan.limit {
            break;
        }
        if tx.send(Event::Dispatched { id }).await.is_err() {
            // Consumer hung up (user quit): stop dispatching. Late probe
            // completions are discarded with the channel.
            tracing::debug!(id, "event channel closed, stopping dispatch");
            return;
        }
        let client = client.clone();
        let method = plan.method.clone();
        let url = plan.url.clone();
        let filter = plan.json_filter.clone();
        let tx = tx.clone();
        inflight.spawn(async move {
            let report = probe::execute(&client, method, url, filter.as_deref(), id).await;
            let _ = tx.send(Event::Completed(report)).await;
        });
        id += 1;
        ticker.tick().await;
    }

    tracing::debug!(dispatched = id - 1, "limit reached, draining in-flight probes");
    while inflight.join_next().await.is_some() {}
    let _ = tx.send(Event::Drained).await;
}
