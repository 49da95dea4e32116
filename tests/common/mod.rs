//! Shared utilities for integration tests.

use std::collections::HashSet;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use failover_dispatch::{BoxError, Endpoint};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a programmable mock backend on an ephemeral port.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Connectivity check whose failing hosts can be changed while it runs.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct ScriptedCheck {
    pub down: Arc<Mutex<HashSet<String>>>,
    pub calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl ScriptedCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_down(&self, host: &str) {
        self.down.lock().unwrap().insert(host.to_string());
    }

    pub fn set_up(&self, host: &str) {
        self.down.lock().unwrap().remove(host);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Closure form accepted by `Failover::new`.
    pub fn as_check(
        &self,
    ) -> impl Fn(Endpoint) -> std::future::Ready<Result<(), BoxError>> + Send + Sync + 'static {
        let script = self.clone();
        move |endpoint: Endpoint| {
            script.calls.fetch_add(1, Ordering::SeqCst);
            let host = endpoint.host().unwrap_or_default().to_string();
            let result: Result<(), BoxError> = if script.down.lock().unwrap().contains(&host) {
                Err(format!("{} is down", host).into())
            } else {
                Ok(())
            };
            std::future::ready(result)
        }
    }
}

#[allow(dead_code)]
pub fn ep(raw: &str) -> Endpoint {
    Endpoint::must_parse(raw)
}
