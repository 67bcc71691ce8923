//! Canned single-response HTTP servers for probe tests, bound to port 0 so
//! tests never collide.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const JSON_OK: &str = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 7\r\nConnection: close\r\n\r\n{\"a\":1}";
pub const PLAIN_OK: &str =
    "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok";

/// Serve `response` to every connection, sleeping `delay` first.
pub async fn serve_canned(response: &'static str, delay: Duration) -> String {
    serve(response, move |_| delay).await
}

/// Serve `response` with a per-connection delay taken from `delays` in
/// accept order; connections past the end answer immediately.
pub async fn serve_canned_with_delays(response: &'static str, delays: Vec<Duration>) -> String {
    serve(response, move |n| {
        delays.get(n).copied().unwrap_or(Duration::ZERO)
    })
    .await
}

/// An address nothing listens on (bound, then dropped).
pub async fn refused_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

async fn serve<F>(response: &'static str, delay_for: F) -> String
where
    F: Fn(usize) -> Duration + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut accepted = 0usize;
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                break;
            };
            let delay = delay_for(accepted);
            accepted += 1;
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = sock.read(&mut buf).await;
                tokio::time::sleep(delay).await;
                let _ = sock.write_all(response.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });
    format!("http://{addr}/")
}
