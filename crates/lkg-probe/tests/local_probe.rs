//! Probe against local sockets

use lkg_core::error::NetworkError;
use lkg_probe::{probe, ProbeConfig, ProbeOutcome, Verdict};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve `responses` on one connection each, reading the request first
async fn serve(responses: Vec<&'static str>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        for response in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
    });
    format!("http://{addr}")
}

async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

fn local(urls: Vec<String>) -> ProbeConfig {
    ProbeConfig {
        connect_timeout: Duration::from_secs(2),
        timeout: Duration::from_secs(5),
        ..ProbeConfig::default()
    }
    .with_urls(urls)
    .without_proxy()
}

#[tokio::test]
async fn ok_and_unexpected_statuses() {
    let base = serve(vec![
        "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    ])
    .await;

    let report = probe(local(vec![format!("{base}/"), format!("{base}/missing")]))
        .await
        .unwrap();

    assert_eq!(report.results[0].outcome, ProbeOutcome::Reachable { status: 200 });
    assert_eq!(report.results[1].outcome, ProbeOutcome::Unexpected { status: 404 });
    assert_eq!(report.verdict(), Verdict::Partial);
}

#[tokio::test]
async fn refused_connection_is_connection_error() {
    let report = probe(local(vec![closed_port().await])).await.unwrap();

    match &report.results[0].outcome {
        ProbeOutcome::Failed { error } => {
            assert!(matches!(error, NetworkError::Connection { .. }), "{error:?}");
            assert!(error.to_string().starts_with("connection error: "));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(report.verdict(), Verdict::Unreachable);
}

#[tokio::test]
async fn silent_server_times_out() {
    // Accepts but never answers
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let config = ProbeConfig {
        timeout: Duration::from_millis(300),
        ..local(vec![format!("http://{addr}/")])
    };
    let report = probe(config).await.unwrap();

    match &report.results[0].outcome {
        ProbeOutcome::Failed { error } => {
            assert!(matches!(error, NetworkError::Timeout { .. }), "{error:?}");
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}
