//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use webhook_relay::config::RelayConfig;
use webhook_relay::http::HttpServer;
use webhook_relay::lifecycle::Shutdown;

/// One request as seen by a mock downstream.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// A mock downstream that records every request it receives.
pub struct MockDownstream {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockDownstream {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }

    /// Poll until at least `count` requests arrived or `timeout` passed.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<CapturedRequest> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let captured = self.captured();
            if captured.len() >= count || tokio::time::Instant::now() >= deadline {
                return captured;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

/// Start a mock downstream; `status_for` picks the status code by path.
pub async fn start_capturing_backend<F>(status_for: F) -> MockDownstream
where
    F: Fn(&str) -> u16 + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let status_for = Arc::new(status_for);

    let sink = captured.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let sink = sink.clone();
                    let status_for = status_for.clone();
                    tokio::spawn(async move {
                        let _ = serve_one(socket, sink, status_for).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockDownstream { addr, captured }
}

async fn serve_one<F>(
    mut socket: TcpStream,
    sink: Arc<Mutex<Vec<CapturedRequest>>>,
    status_for: Arc<F>,
) -> std::io::Result<()>
where
    F: Fn(&str) -> u16 + Send + Sync + 'static,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    let status = status_for(&path);
    sink.lock().unwrap().push(CapturedRequest {
        method,
        path,
        headers,
        body,
    });

    let status_text = match status {
        200 => "200 OK",
        201 => "201 Created",
        400 => "400 Bad Request",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status_text
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}

/// A downstream that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Relay config pointing every target at `mock`, allowing loopback only.
pub fn relay_config(mock: &MockDownstream) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.access.allowed_ips = vec!["127.0.0.1".into()];
    config.targets.trade = mock.url("/trade");
    config.targets.exit = mock.url("/exit");
    config.targets.reverse_exit = mock.url("/reverse/exit");
    config.targets.reverse_entry = mock.url("/reverse/entry");
    config.timeouts.forward_secs = 5;
    config
}

/// Start the relay on an ephemeral port. Keep the `Shutdown` alive for the
/// duration of the test.
pub async fn start_relay(config: RelayConfig) -> (SocketAddr, Shutdown) {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
