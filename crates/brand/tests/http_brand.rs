use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use brand::{
    BRAND_DATA_KEY, BrandClientConfig, BrandOrigin, BrandPhase, BrandSyncClient,
    MemorySessionStore, SessionStore, describe,
};
use serde_json::{Value, json};
use sfukit_common::types::BrandDocument;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;

struct TestServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Clone)]
struct Behaviour {
    status: StatusCode,
    body: Value,
    delay: Duration,
    hits: Arc<AtomicUsize>,
}

async fn brand_handler(State(behaviour): State<Behaviour>) -> (StatusCode, Json<Value>) {
    behaviour.hits.fetch_add(1, Ordering::SeqCst);
    if !behaviour.delay.is_zero() {
        tokio::time::sleep(behaviour.delay).await;
    }
    (behaviour.status, Json(behaviour.body))
}

async fn start_test_server(status: StatusCode, body: Value, delay: Duration) -> TestServer {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/brand", get(brand_handler))
        .with_state(Behaviour {
            status,
            body,
            delay,
            hits: hits.clone(),
        });

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read bound addr");
    let base_url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Brand test server exited unexpectedly");
    });

    TestServer {
        base_url,
        hits,
        handle,
    }
}

fn server_brand() -> Value {
    json!({
        "message": {
            "app": { "name": "Acme Meet", "joinButtonLabel": "ENTER" },
            "html": { "sponsors": false, "advertisers": false }
        }
    })
}

fn http_client(base_url: &str, store: Arc<MemorySessionStore>, timeout: Duration) -> BrandSyncClient {
    BrandSyncClient::http(
        base_url,
        store,
        BrandClientConfig {
            timeout,
            ..Default::default()
        },
    )
    .expect("Failed to create brand client")
}

#[tokio::test]
async fn test_fetch_success_is_cached_in_session() {
    let server = start_test_server(StatusCode::OK, server_brand(), Duration::ZERO).await;
    let store = Arc::new(MemorySessionStore::new());
    let client = http_client(&server.base_url, store.clone(), Duration::from_secs(5));

    let state = client.get_brand().await;

    assert_eq!(state.phase(), BrandPhase::Cached);
    assert_eq!(state.origin(), BrandOrigin::Remote);
    let app = state.document().app.as_ref().unwrap();
    assert_eq!(app.name.as_deref(), Some("Acme Meet"));
    assert_eq!(state.document().html.as_ref().unwrap().sponsors, Some(false));

    let cached = store.get(BRAND_DATA_KEY).expect("brandData should be stored");
    let cached: BrandDocument = serde_json::from_str(&cached).unwrap();
    assert_eq!(&cached, state.document());

    client.get_brand().await;
    assert_eq!(server.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_remote_extra_fields_survive_session_cache() {
    let body = json!({
        "message": {
            "app": { "name": "Acme Meet", "tagline": "meet anywhere" },
            "html": { "sponsors": false },
            "footer": { "copyright": "Acme" }
        }
    });
    let server = start_test_server(StatusCode::OK, body, Duration::ZERO).await;
    let store = Arc::new(MemorySessionStore::new());
    let client = http_client(&server.base_url, store.clone(), Duration::from_secs(5));

    let state = client.get_brand().await;
    assert_eq!(
        describe(state.document()),
        "name=Acme Meet, hidden_sections=[\"sponsors\"]"
    );

    let cached: Value =
        serde_json::from_str(&store.get(BRAND_DATA_KEY).expect("brandData should be stored"))
            .unwrap();
    assert_eq!(cached["app"]["tagline"], "meet anywhere");
    assert_eq!(cached["footer"]["copyright"], "Acme");
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let server = start_test_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "boom" }),
        Duration::ZERO,
    )
    .await;
    let store = Arc::new(MemorySessionStore::new());
    let client = http_client(&server.base_url, store.clone(), Duration::from_secs(5));

    let state = client.get_brand().await;

    assert_eq!(state.phase(), BrandPhase::Fallback);
    assert_eq!(state.document(), &BrandDocument::builtin());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_missing_message_falls_back() {
    let server = start_test_server(StatusCode::OK, json!({}), Duration::ZERO).await;
    let client = http_client(
        &server.base_url,
        Arc::new(MemorySessionStore::new()),
        Duration::from_secs(5),
    );

    assert_eq!(client.get_brand().await.phase(), BrandPhase::Fallback);
}

#[tokio::test]
async fn test_unreachable_endpoint_falls_back() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = http_client(
        &format!("http://{addr}"),
        Arc::new(MemorySessionStore::new()),
        Duration::from_secs(5),
    );

    let state = client.get_brand().await;
    assert_eq!(state.phase(), BrandPhase::Fallback);
    assert_eq!(state.origin(), BrandOrigin::BuiltIn);
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let server = start_test_server(StatusCode::OK, server_brand(), Duration::from_secs(10)).await;
    let store = Arc::new(MemorySessionStore::new());
    let client = http_client(&server.base_url, store.clone(), Duration::from_millis(200));

    let started = std::time::Instant::now();
    let state = client.get_brand().await;

    assert_eq!(state.phase(), BrandPhase::Fallback);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_session_reused_across_clients() {
    let server = start_test_server(StatusCode::OK, server_brand(), Duration::ZERO).await;
    let store = Arc::new(MemorySessionStore::new());

    let first = http_client(&server.base_url, store.clone(), Duration::from_secs(5))
        .get_brand()
        .await;
    let second = http_client(&server.base_url, store.clone(), Duration::from_secs(5))
        .get_brand()
        .await;

    assert_eq!(first.document(), second.document());
    assert_eq!(second.origin(), BrandOrigin::SessionCache);
    assert_eq!(server.hits.load(Ordering::SeqCst), 1);

    // 新会话重新请求
    store.clear();
    http_client(&server.base_url, store, Duration::from_secs(5))
        .get_brand()
        .await;
    assert_eq!(server.hits.load(Ordering::SeqCst), 2);
}
