//! Local HTTP responder for exercising the real GitHub client.
//!
//! Each route maps a request path to a canned status and body. Every request
//! received is recorded so tests can assert on method, path and headers.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;

pub struct Route {
    pub path: String,
    pub status: u16,
    pub body: Vec<u8>,
}

impl Route {
    pub fn new(path: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.to_owned(),
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

type Recorded = Arc<Mutex<Vec<RecordedRequest>>>;

pub struct TestServer {
    pub base_url: String,
    pub requests: Recorded,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub async fn serve(routes: Vec<Route>) -> TestServer {
    serve_with(|_| routes).await
}

/// Like [`serve`], for routes whose bodies need the server's own base URL.
pub async fn serve_with<F>(build_routes: F) -> TestServer
where
    F: FnOnce(&str) -> Vec<Route>,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("test server address");
    let base_url = format!("http://{addr}");
    let requests: Recorded = Arc::new(Mutex::new(Vec::new()));

    let mut app = Router::new();
    for route in build_routes(&base_url) {
        let status = StatusCode::from_u16(route.status).expect("valid status code");
        let body = route.body;
        app = app.route(&route.path, get(move || async move { (status, body) }));
    }
    let app = app
        .fallback(|| async { (StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#) })
        .layer(middleware::from_fn_with_state(requests.clone(), record));

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server error");
    });

    TestServer { base_url, requests }
}

async fn record(State(requests): State<Recorded>, request: Request, next: Next) -> Response {
    requests.lock().unwrap().push(RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_owned(),
        headers: request.headers().clone(),
    });
    next.run(request).await
}

/// A port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
