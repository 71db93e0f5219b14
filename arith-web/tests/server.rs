use std::net::SocketAddr;
use std::time::Duration;

use arith_web::{ServerConfig, serve};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time;

async fn start(config: ServerConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(serve(listener, config));
    addr
}

async fn exchange(addr: SocketAddr, raw: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(raw.as_bytes()).await.expect("send");
    let mut response = String::new();
    stream.read_to_string(&mut response).await.expect("receive");

    let status = response
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .expect("status code");
    let body = response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .expect("body separator");
    (status, body)
}

fn post(expression_json: &str) -> String {
    format!(
        "POST /api/v1/calculate HTTP/1.1\r\nHost: test\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        expression_json.len(),
        expression_json
    )
}

#[tokio::test]
async fn calculates_over_tcp() {
    let addr = start(ServerConfig::default()).await;
    let (status, body) = exchange(addr, &post(r#"{"expression":"(1+2)*3"}"#)).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(json["result"], 9.0);
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn classifies_failures() {
    let addr = start(ServerConfig::default()).await;

    let (status, body) = exchange(addr, &post(r#"{"expression":"1+2)"}"#)).await;
    assert_eq!(status, 422);
    assert!(body.contains("Expression is not valid"));

    let (status, body) = exchange(addr, &post(r#"{"expression":"5/0"}"#)).await;
    assert_eq!(status, 400);
    assert!(body.contains("Division by zero"));

    let (status, body) = exchange(addr, &post("{oops")).await;
    assert_eq!(status, 400);
    assert!(body.contains("Invalid JSON"));
}

#[tokio::test]
async fn rejects_framing_errors() {
    let addr = start(ServerConfig {
        max_body_bytes: 16,
        ..ServerConfig::default()
    })
    .await;

    let (status, _) = exchange(addr, "GET /api/v1/calculate HTTP/1.1\r\n\r\n").await;
    assert_eq!(status, 405);

    let (status, _) = exchange(addr, "POST /nowhere HTTP/1.1\r\nContent-Length: 0\r\n\r\n").await;
    assert_eq!(status, 404);

    let (status, _) = exchange(addr, &post(r#"{"expression":"1+1+1+1+1+1"}"#)).await;
    assert_eq!(status, 413);

    let (status, _) = exchange(addr, "garbage\r\n\r\n").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn serves_concurrent_clients() {
    let addr = start(ServerConfig::default()).await;

    let clients: Vec<_> = (1..=16)
        .map(|n| {
            tokio::spawn(async move {
                let body = format!(r#"{{"expression":"{n} * {n}"}}"#);
                let (status, body) = exchange(addr, &post(&body)).await;
                (n, status, body)
            })
        })
        .collect();

    for client in clients {
        let (n, status, body) = client.await.expect("client task");
        assert_eq!(status, 200);
        let json: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["result"], (n * n) as f64);
    }
}

#[tokio::test]
async fn drops_silent_clients_after_read_timeout() {
    let addr = start(ServerConfig {
        read_timeout: Duration::from_millis(100),
        ..ServerConfig::default()
    })
    .await;

    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let mut response = Vec::new();
    let read = time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("server closed the idle connection");
    assert!(read.is_ok());
    assert!(response.is_empty());

    // A slow client is cut off the same way, without a response.
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream
        .write_all(b"POST /api/v1/calculate HTTP/1.1\r\n")
        .await
        .expect("send partial head");
    let mut response = Vec::new();
    time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("server closed the stalled connection")
        .expect("clean close");
    assert!(response.is_empty());
}
