//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use subdomain_gateway::config::parse_config;
use subdomain_gateway::lifecycle::{self, RunningGateway, Shutdown};

/// Start a mock path gateway that answers every request with
/// `{request-target} {x-gateway-hostname-kind}:{x-gateway-hostname}`.
pub async fn start_echo_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut chunk = [0u8; 4096];
                loop {
                    let n = socket.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&chunk[..n]);
                    if head.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let head = String::from_utf8_lossy(&head);
                let mut lines = head.split("\r\n");
                let target = lines
                    .next()
                    .and_then(|line| line.split(' ').nth(1))
                    .unwrap_or_default()
                    .to_string();
                let mut hostname = String::new();
                let mut kind = String::new();
                for line in lines {
                    let Some((name, value)) = line.split_once(':') else {
                        continue;
                    };
                    match name.trim().to_ascii_lowercase().as_str() {
                        "x-gateway-hostname" => hostname = value.trim().to_string(),
                        "x-gateway-hostname-kind" => kind = value.trim().to_string(),
                        _ => {}
                    }
                }

                let body = format!("{target} {kind}:{hostname}");
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });

    addr
}

/// Start the gateway from a TOML snippet on an ephemeral port.
pub async fn start_gateway(toml: &str, upstream: SocketAddr) -> (RunningGateway, Shutdown) {
    let mut config = parse_config(toml).unwrap();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.address = upstream.to_string();

    let shutdown = Shutdown::new();
    let gateway = lifecycle::start(config, &shutdown).await.unwrap();
    (gateway, shutdown)
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
