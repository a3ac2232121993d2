//! Shared utilities for integration tests.

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

use thing_server::exceptions::{ErrorResponder, MemorySink, Registry};
use thing_server::http::{AppState, HttpServer};
use thing_server::notify::{Notification, Notifier, NotifyError};
use thing_server::store::{MemoryThingStore, StoreError, Thing, ThingStore};

/// Notifier that succeeds or fails on demand and counts calls.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeNotifier {
    pub fail: bool,
    pub calls: AtomicU32,
}

#[allow(dead_code)]
impl FakeNotifier {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send_notification(&self, _notification: &Notification) -> Result<(), NotifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(NotifyError::Rejected(reqwest::StatusCode::SERVICE_UNAVAILABLE))
        } else {
            Ok(())
        }
    }
}

/// Store whose lookups panic.
#[allow(dead_code)]
pub struct PanickingStore;

#[async_trait]
impl ThingStore for PanickingStore {
    async fn find_by_name(&self, _name: &str) -> Result<Option<Thing>, StoreError> {
        panic!("store index corrupted")
    }

    async fn insert(&self, _thing: Thing) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Router wired to fakes, plus handles to inspect them.
#[allow(dead_code)]
pub struct Harness {
    pub router: Router,
    pub sink: Arc<MemorySink>,
    pub store: MemoryThingStore,
    pub notifier: Arc<FakeNotifier>,
}

#[allow(dead_code)]
impl Harness {
    pub async fn new(notifier_fails: bool, seed: &[&str]) -> Self {
        let store = MemoryThingStore::new();
        for name in seed {
            store.insert(Thing::new(*name)).await.unwrap();
        }
        let notifier = Arc::new(FakeNotifier {
            fail: notifier_fails,
            ..Default::default()
        });
        let sink = Arc::new(MemorySink::new());

        let state = AppState {
            store: Arc::new(store.clone()),
            notifier: notifier.clone(),
        };
        let router = build_router(state, sink.clone());

        Self {
            router,
            sink,
            store,
            notifier,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (Response, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        (
            Response::from_parts(parts, Body::empty()),
            String::from_utf8(bytes.to_vec()).unwrap(),
        )
    }
}

#[allow(dead_code)]
pub fn build_router(state: AppState, sink: Arc<MemorySink>) -> Router {
    let registry = Arc::new(Registry::builtin().unwrap());
    HttpServer::build_router(
        state,
        ErrorResponder::new(registry, sink),
        Duration::from_secs(5),
    )
}

#[allow(dead_code)]
pub fn post_thing(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/things")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn get_root() -> Request<Body> {
    Request::builder().uri("/").body(Body::empty()).unwrap()
}

/// Read one HTTP/1.1 request (headers and Content-Length body) and return the body.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return String::new(),
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf[header_end..]).into_owned()
}

/// Start a programmable mock notification backend on an ephemeral port.
///
/// `f` receives each request body and returns the status to answer with.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = u16> + Send + 'static,
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
                        let body = read_request(&mut socket).await;
                        let status = f(body).await;
                        let status_text = match status {
                            200 => "200 OK",
                            204 => "204 No Content",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                            status_text
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
