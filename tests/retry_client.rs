use geo_enrich::{
    ApiRequest, Backoff, ClientConfig, HttpError, JsonFetcher, RetryClient, RetryPolicy,
    TransportErrorKind, MAX_BODY_EXCERPT,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A one-connection-per-response HTTP server that records each request head.
struct TestServer {
    addr: SocketAddr,
    seen: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    async fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                log.lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&head).to_string());
                let reply = format!(
                    "HTTP/1.1 {} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        Self { addr, seen }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn requests(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

fn fast_client(adapter_retries: u32, timeout_retries: u32) -> RetryClient {
    let config = ClientConfig::builder()
        .adapter_policy(
            RetryPolicy::adapter_default()
                .with_backoff(Backoff::None)
                .with_max_retries(adapter_retries),
        )
        .timeout_policy(
            RetryPolicy::timeout_default()
                .with_backoff(Backoff::None)
                .with_max_retries(timeout_retries),
        )
        .build();
    RetryClient::new(config).unwrap()
}

#[tokio::test]
async fn test_retryable_status_then_success() -> Result<(), HttpError> {
    let server = TestServer::start(vec![
        (503, r#"{"error":"busy"}"#.to_string()),
        (200, r#"{"results":[1,2]}"#.to_string()),
    ])
    .await;
    let client = fast_client(5, 2);

    let body = client.get_json(&ApiRequest::new(server.url("/stations"))).await?;
    assert_eq!(body, json!({"results": [1, 2]}));
    assert_eq!(server.requests().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_terminal_status_is_not_retried() {
    let server = TestServer::start(vec![(404, "x".repeat(1000))]).await;
    let client = fast_client(5, 2);

    let err = client
        .get_json(&ApiRequest::new(server.url("/missing")))
        .await
        .unwrap_err();
    match &err {
        HttpError::Status { status, body, .. } => {
            assert_eq!(*status, 404);
            assert_eq!(body.len(), MAX_BODY_EXCERPT);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.is_transient());
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_retryable_status_exhausts_into_status_error() {
    let busy = (503, "{}".to_string());
    let server = TestServer::start(vec![busy.clone(), busy.clone(), busy]).await;
    let client = fast_client(2, 2);

    let err = client
        .get_json(&ApiRequest::new(server.url("/data")))
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Status { status: 503, .. }));
    assert!(err.is_transient());
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn test_query_and_headers_are_forwarded() -> Result<(), HttpError> {
    let server = TestServer::start(vec![(200, "{}".to_string())]).await;
    let client = fast_client(0, 0);
    let request = ApiRequest::new(server.url("/data"))
        .query("datatypeid", "TMAX")
        .query("datatypeid", "PRCP")
        .query("units", "standard")
        .header("token", "abc123");

    client.get_json(&request).await?;
    let head = server.requests()[0].to_lowercase();
    assert!(head.starts_with("get /data?datatypeid=tmax&datatypeid=prcp&units=standard http/1.1"));
    assert!(head.contains("\r\ntoken: abc123\r\n"));
    assert!(head.contains("user-agent: geo_enrich/"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_json_is_a_decode_error() {
    let server = TestServer::start(vec![(200, "<html>".to_string())]).await;
    let client = fast_client(0, 0);

    let err = client
        .get_json(&ApiRequest::new(server.url("/")))
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Decode { .. }));
}

#[tokio::test]
async fn test_connection_refused_runs_both_tiers() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = fast_client(1, 1);

    let err = client
        .get_json(&ApiRequest::new(format!("http://{}/data", addr)))
        .await
        .unwrap_err();
    match err {
        HttpError::Transport { attempts, kind, .. } => {
            assert_eq!(kind, TransportErrorKind::Connect);
            assert_eq!(attempts, 4);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
