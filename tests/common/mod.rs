//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

use edge_proxy::config::{HostStrategy, ProxyConfig, ServiceConfig};
use edge_proxy::{HttpServer, Shutdown};

/// Start a backend that echoes the received request back as JSON:
/// `{ "method", "path", "headers", "body" }`, with `path` being the raw
/// request-target (including any query string) and header names lowercased.
///
/// The response also carries `X-Echo-Backend: yes` and a stale
/// `Access-Control-Allow-Origin`, so tests can verify that downstream
/// headers are relayed and the CORS set is overwritten at the edge.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        if let Some((method, target, headers, body)) =
                            read_http_request(&mut socket).await
                        {
                            let echo = serde_json::json!({
                                "method": method,
                                "path": target,
                                "headers": headers,
                                "body": String::from_utf8_lossy(&body),
                            });
                            let payload = echo.to_string();
                            let response = format!(
                                "HTTP/1.1 200 OK\r\n\
                                 Content-Type: application/json\r\n\
                                 Content-Length: {}\r\n\
                                 X-Echo-Backend: yes\r\n\
                                 Access-Control-Allow-Origin: https://stale.example\r\n\
                                 Connection: close\r\n\r\n{}",
                                payload.len(),
                                payload
                            );
                            let _ = socket.write_all(response.as_bytes()).await;
                        }
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that answers every request with a fixed status and body.
#[allow(dead_code)]
pub async fn start_status_backend(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let _ = read_http_request(&mut socket).await;
                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Reserve a local port with nothing listening on it.
#[allow(dead_code)]
pub async fn unreachable_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// A proxy configuration routing `/chatbot` and `/contact` to the given
/// local ports, addressing the backend literally (no wildcard-DNS rewrite
/// on loopback).
pub fn test_config(chatbot_port: u16, contact_port: u16) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.backend.address = "127.0.0.1".to_string();
    config.backend.host_strategy = HostStrategy::LiteralAddress;
    config.services = vec![
        ServiceConfig {
            name: "chatbot".to_string(),
            prefix: "/chatbot".to_string(),
            port: chatbot_port,
        },
        ServiceConfig {
            name: "contact".to_string(),
            prefix: "/contact".to_string(),
            port: contact_port,
        },
    ];
    config.observability.metrics_enabled = false;
    config
}

/// Spawn the proxy on an ephemeral port. Returns its address and the
/// shutdown handle keeping it alive.
pub async fn spawn_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx: broadcast::Receiver<()> = shutdown.subscribe();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// Minimal HTTP/1.1 request reader: request line, headers (lowercased
/// names), and a Content-Length-delimited body.
async fn read_http_request(
    socket: &mut TcpStream,
) -> Option<(String, String, HashMap<String, String>, Vec<u8>)> {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find_blank_line(&buf) {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut body: Vec<u8> = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some((method, target, headers, body))
}

fn find_blank_line(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
