//! `HttpTransport` against an in-process repository server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, put};
use axum::Router;
use plasma_keyring::CredentialsItem;
use plasma_repository::transport::{HttpTransport, RepositoryTransport};
use tempfile::TempDir;

/// `alice:pw`
const GOOD_AUTH: &str = "Basic YWxpY2U6cHc=";

#[derive(Clone, Default)]
struct Uploads {
    received: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(GOOD_AUTH)
}

async fn root(headers: HeaderMap) -> StatusCode {
    if authorized(&headers) {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn store(
    State(uploads): State<Uploads>,
    Path((repo, file)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    uploads
        .received
        .lock()
        .unwrap()
        .push((format!("{repo}/{file}"), body.to_vec()));
    StatusCode::CREATED
}

async fn serve(uploads: Uploads) -> String {
    let app = Router::new()
        .route("/", get(root))
        .route("/down", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                StatusCode::OK
            }),
        )
        .route("/repository/{repo}/{file}", put(store))
        .with_state(uploads);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn transport() -> HttpTransport {
    HttpTransport::new(Duration::from_millis(300), None).unwrap()
}

fn alice(url: &str, password: &str) -> CredentialsItem {
    CredentialsItem::new(url, "alice", password)
}

#[tokio::test]
async fn test_probe_reports_status() {
    let base = serve(Uploads::default()).await;
    let t = transport();
    assert_eq!(t.probe(&base).await.unwrap(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        t.probe(&format!("{base}/down")).await.unwrap(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_probe_times_out() {
    let base = serve(Uploads::default()).await;
    let err = transport()
        .probe(&format!("{base}/slow"))
        .await
        .unwrap_err();
    assert!(err.message.contains("timed out"), "got: {err}");
}

#[tokio::test]
async fn test_probe_unreachable_is_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    assert!(transport().probe(&format!("http://{addr}")).await.is_err());
}

#[tokio::test]
async fn test_head_sends_basic_auth() {
    let base = serve(Uploads::default()).await;
    let t = transport();
    assert_eq!(
        t.head(&base, &alice(&base, "pw")).await.unwrap(),
        StatusCode::OK
    );
    assert_eq!(
        t.head(&base, &alice(&base, "wrong")).await.unwrap(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_put_streams_file_body() {
    let uploads = Uploads::default();
    let base = serve(uploads.clone()).await;

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("sample-abcdef1-plasma-src.tar.gz");
    let content = vec![7u8; 200_000];
    std::fs::write(&path, &content).unwrap();

    let file = tokio::fs::File::open(&path).await.unwrap();
    let url = format!("{base}/repository/sample-artifacts/sample-abcdef1-plasma-src.tar.gz");
    let status = transport()
        .put_file(&url, &alice(&base, "pw"), file, content.len() as u64)
        .await
        .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    let received = uploads.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0].0,
        "sample-artifacts/sample-abcdef1-plasma-src.tar.gz"
    );
    assert_eq!(received[0].1, content);
}
