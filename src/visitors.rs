use crate::state::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashSet,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use tokio::sync::Mutex;
use tracing::debug;

/// Set of client addresses seen since startup. Only used for the display counter.
#[derive(Clone, Default)]
pub struct VisitorTracker {
    seen: Arc<Mutex<HashSet<IpAddr>>>,
}

impl VisitorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the address had not been seen before.
    pub async fn record(&self, addr: IpAddr) -> bool {
        self.seen.lock().await.insert(addr)
    }

    pub async fn count(&self) -> usize {
        self.seen.lock().await.len()
    }
}

pub async fn track_visitor(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(ConnectInfo(addr)) = connect_info {
        if state.visitors.record(addr.ip()).await {
            debug!(ip = %addr.ip(), "new visitor");
        }
    }
    next.run(request).await
}
