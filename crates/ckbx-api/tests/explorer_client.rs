//! Integration tests for the explorer client against a local one-shot HTTP server.
//!
//! Run with: cargo test -p ckbx-api --test explorer_client

use std::time::Duration;

use ckbx_api::{ApiError, ClientConfig, ExplorerClient, Fetcher};
use ckbx_core::Network;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve a single canned response; the join handle yields the raw request head.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("Failed to accept");
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.expect("Failed to read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/vnd.api+json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("Failed to write response");
        let _ = socket.shutdown().await;

        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{}/api/v1", addr), handle)
}

fn client_for(base_url: String, timeout: Duration) -> ExplorerClient {
    let config = ClientConfig {
        network: Network::Mainnet,
        api_url: Some(base_url),
        timeout,
    };
    ExplorerClient::new(&config).expect("Failed to build client")
}

#[tokio::test]
async fn fetch_address_info_decodes_summary() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ckbx_api=debug")
        .try_init();

    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"data":{"id":"1","type":"address","attributes":{"address_hash":"ckb1abc","balance":"250000000","transactions_count":"3","cell_consumed":"2","lock_script":{"args":["0x01"],"binary_hash":"0x02"}}}}"#,
    )
    .await;
    let client = client_for(base_url, Duration::from_secs(5));

    let response = client
        .fetch_address_info("ckb1abc")
        .await
        .expect("Address fetch failed");
    assert_eq!(response.data.attributes.address_hash, "ckb1abc");
    assert_eq!(response.data.attributes.balance, 250_000_000);
    assert_eq!(response.data.attributes.transactions_count, 3);

    let request = server.await.expect("Server task failed").to_lowercase();
    assert!(request.starts_with("get /api/v1/addresses/ckb1abc http/1.1"));
    assert!(request.contains("accept: application/vnd.api+json"));
    assert!(request.contains("content-type: application/vnd.api+json"));
}

#[tokio::test]
async fn fetch_transactions_sends_page_parameters() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"data":[{"id":"9","type":"ckb_transactions","attributes":{"transaction_hash":"0xfeed"}}],"meta":{"total":"31","page_size":"5"}}"#,
    )
    .await;
    let client = client_for(base_url, Duration::from_secs(5));

    let response = client
        .fetch_transactions_by_address("ckb1abc", 2, 5)
        .await
        .expect("Transactions fetch failed");
    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0].hash(), "0xfeed");
    assert_eq!(response.total(), Some(31));

    let request = server.await.expect("Server task failed");
    assert!(request.starts_with("GET /api/v1/address_transactions/ckb1abc?page=2&page_size=5 HTTP/1.1"));
}

#[tokio::test]
async fn not_found_is_a_status_error() {
    let (base_url, server) = serve_once(
        "404 Not Found",
        r#"{"message":"","errors":[{"title":"Address Not Found","detail":"No address found by given address hash"}]}"#,
    )
    .await;
    let client = client_for(base_url, Duration::from_secs(5));

    let err = client
        .fetch_address_info("ckb1missing")
        .await
        .expect_err("Expected a 404");
    assert!(err.is_not_found());
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "No address found by given address hash");
        }
        other => panic!("Unexpected error: {other}"),
    }
    let _ = server.await;
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let (base_url, server) = serve_once("200 OK", r#"{"data":"nope"}"#).await;
    let client = client_for(base_url, Duration::from_secs(5));

    let err = client
        .fetch_transactions_by_address("ckb1abc", 1, 10)
        .await
        .expect_err("Expected a decode error");
    assert!(matches!(err, ApiError::Decode(_)));
    let _ = server.await;
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);

    let client = client_for(format!("http://{}/api/v1", addr), Duration::from_secs(5));
    let err = client
        .fetch_address_info("ckb1abc")
        .await
        .expect_err("Expected a connection error");
    assert!(matches!(err, ApiError::Http(_)));
}

#[tokio::test]
async fn slow_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    let server = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.expect("Failed to accept");
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let client = client_for(format!("http://{}/api/v1", addr), Duration::from_millis(200));
    let err = client
        .fetch_address_info("ckb1abc")
        .await
        .expect_err("Expected a timeout");
    match err {
        ApiError::Http(e) => assert!(e.is_timeout()),
        other => panic!("Unexpected error: {other}"),
    }
    server.abort();
}
