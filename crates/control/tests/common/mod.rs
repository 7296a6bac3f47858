//! Local fake controller for integration tests
//!
//! Serves the HTTP control contract on an ephemeral port. `next/{id}` is a
//! real long-poll: it waits until the test queues a reply.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use drift_config::ControlConfig;
use drift_model::{CoordinateSystem, Emulation, EmulationInfo, Intermediate, Point, Trace};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Reply to the next pending `next/{id}` request
#[derive(Debug, Clone)]
pub enum Reply {
    Start(Emulation),
    Stop,
    Status(u16),
    Raw(&'static str),
}

/// A report the controller received
#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    Running(EmulationInfo),
    Intermediate(Intermediate),
    Stopped,
}

pub struct FakeController {
    current: Mutex<Option<Emulation>>,
    replies: tokio::sync::Mutex<mpsc::UnboundedReceiver<Reply>>,
    queue: mpsc::UnboundedSender<Reply>,
    received: Mutex<Vec<Received>>,
    ids: Mutex<Vec<String>>,
}

impl FakeController {
    pub fn new() -> Arc<Self> {
        let (queue, replies) = mpsc::unbounded_channel();
        Arc::new(Self {
            current: Mutex::new(None),
            replies: tokio::sync::Mutex::new(replies),
            queue,
            received: Mutex::new(Vec::new()),
            ids: Mutex::new(Vec::new()),
        })
    }

    pub fn set_current(&self, emulation: Option<Emulation>) {
        *self.current.lock() = emulation;
    }

    pub fn push(&self, reply: Reply) {
        self.queue.send(reply).unwrap();
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().clone()
    }

    pub fn running_count(&self) -> usize {
        self.received()
            .iter()
            .filter(|r| matches!(r, Received::Running(_)))
            .count()
    }

    pub fn stopped_count(&self) -> usize {
        self.received()
            .iter()
            .filter(|r| matches!(r, Received::Stopped))
            .count()
    }

    /// Session ids seen in request paths
    pub fn ids(&self) -> Vec<String> {
        self.ids.lock().clone()
    }

    /// Wait until `predicate` holds, panicking after 5 seconds
    pub async fn wait_for(&self, what: &str, predicate: impl Fn(&Self) -> bool) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while !predicate(self) {
            assert!(
                tokio::time::Instant::now() < deadline,
                "timed out waiting for {what}: {:?}",
                self.received()
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Serve on an ephemeral local port
    pub async fn spawn(self: &Arc<Self>) -> SocketAddr {
        let app = Router::new()
            .route("/current", get(current))
            .route("/next/{id}", get(next))
            .route("/state/{id}/running", post(running))
            .route("/state/{id}/stopped", get(stopped))
            .route("/intermediate/{id}", post(intermediate))
            .with_state(Arc::clone(self));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn seen(&self, id: String) {
        self.ids.lock().push(id);
    }
}

async fn current(State(fake): State<Arc<FakeController>>) -> Response {
    match fake.current.lock().clone() {
        Some(emulation) => Json(emulation).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn next(State(fake): State<Arc<FakeController>>, Path(id): Path<String>) -> Response {
    fake.seen(id);
    let mut replies = fake.replies.lock().await;
    match replies.recv().await {
        Some(Reply::Start(emulation)) => Json(emulation).into_response(),
        Some(Reply::Stop) => StatusCode::NO_CONTENT.into_response(),
        Some(Reply::Status(code)) => StatusCode::from_u16(code).unwrap().into_response(),
        Some(Reply::Raw(body)) => (StatusCode::OK, body).into_response(),
        None => std::future::pending().await,
    }
}

async fn running(
    State(fake): State<Arc<FakeController>>,
    Path(id): Path<String>,
    Json(info): Json<EmulationInfo>,
) -> StatusCode {
    fake.seen(id);
    fake.received.lock().push(Received::Running(info));
    StatusCode::OK
}

async fn stopped(State(fake): State<Arc<FakeController>>, Path(id): Path<String>) -> StatusCode {
    fake.seen(id);
    fake.received.lock().push(Received::Stopped);
    StatusCode::OK
}

async fn intermediate(
    State(fake): State<Arc<FakeController>>,
    Path(id): Path<String>,
    Json(report): Json<Intermediate>,
) -> StatusCode {
    fake.seen(id);
    fake.received.lock().push(Received::Intermediate(report));
    StatusCode::OK
}

// =============================================================================
// Fixtures
// =============================================================================

/// Control config pointing at `addr`
pub fn control_config(addr: SocketAddr) -> ControlConfig {
    ControlConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        reconnect_interval: Duration::from_millis(20),
        request_timeout: Duration::from_secs(2),
        ..ControlConfig::default()
    }
}

/// A port with nothing listening on it
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Straight line of planar length `length`, played at 1 unit per second
pub fn line(length: f64) -> Emulation {
    Emulation::new(
        Trace::new(
            vec![Point::new(0.0, 0.0), Point::new(0.0, length)],
            CoordinateSystem::Wgs84,
        ),
        1.0,
    )
}
