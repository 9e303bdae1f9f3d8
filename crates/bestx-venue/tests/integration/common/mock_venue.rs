//! Mock venue REST server for integration tests.
//!
//! Provides a small HTTP server that can:
//! - Serve canned responses per method and path
//! - Delay a response to trigger client timeouts
//! - Record every request it receives

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A request as seen by the mock venue.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Clone)]
struct CannedResponse {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(Method, String), CannedResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A mock venue server for testing.
pub struct MockVenueServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    state: Arc<MockState>,
}

impl MockVenueServer {
    /// Start a new mock server on an available port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(MockState::default());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new().fallback(handle).with_state(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            state,
        }
    }

    /// Base URL to hand to an adapter config.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Respond to `method path` with `status` and `body`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: &str) {
        self.insert(method, path, status, body, None);
    }

    /// Like [`respond`](Self::respond), but wait `delay` first.
    pub fn respond_after(&self, method: Method, path: &str, delay: Duration, body: &str) {
        self.insert(method, path, 200, body, Some(delay));
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    /// Shutdown the server.
    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    fn insert(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: &str,
        delay: Option<Duration>,
    ) {
        self.state.routes.lock().insert(
            (method, path.to_string()),
            CannedResponse {
                status: StatusCode::from_u16(status).unwrap(),
                body: body.to_string(),
                delay,
            },
        );
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });

    let canned = state.routes.lock().get(&(method, path)).cloned();
    match canned {
        Some(canned) => {
            if let Some(delay) = canned.delay {
                tokio::time::sleep(delay).await;
            }
            (
                canned.status,
                [(header::CONTENT_TYPE, "application/json")],
                canned.body,
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "no canned response").into_response(),
    }
}
