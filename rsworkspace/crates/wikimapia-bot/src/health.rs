//! Health check and metrics endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub uptime_seconds: u64,
    pub nats_connected: bool,
    pub bot_username: Option<String>,
}

/// Metrics data
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Metrics {
    pub updates_received: u64,
    pub locations_received: u64,
    pub places_selected: u64,
    pub photos_sent: u64,
    pub active_sessions: usize,
    pub errors: u64,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<RwLock<Metrics>>,
    pub start_time: SystemTime,
    pub bot_username: Option<String>,
    pub nats_connected: Arc<RwLock<bool>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AppState {
    pub fn new(bot_username: Option<String>) -> Self {
        Self {
            metrics: Arc::new(RwLock::new(Metrics::default())),
            start_time: SystemTime::now(),
            bot_username,
            nats_connected: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn increment_updates_received(&self) {
        self.metrics.write().await.updates_received += 1;
    }

    pub async fn increment_locations(&self) {
        self.metrics.write().await.locations_received += 1;
    }

    pub async fn increment_selections(&self) {
        self.metrics.write().await.places_selected += 1;
    }

    pub async fn increment_photos_sent(&self) {
        self.metrics.write().await.photos_sent += 1;
    }

    pub async fn increment_errors(&self) {
        self.metrics.write().await.errors += 1;
    }

    pub async fn set_active_sessions(&self, count: usize) {
        self.metrics.write().await.active_sessions = count;
    }

    pub async fn snapshot(&self) -> Metrics {
        self.metrics.read().await.clone()
    }
}

/// Health check endpoint handler
async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let uptime = state.start_time.elapsed().unwrap_or_default().as_secs();
    let nats_connected = *state.nats_connected.read().await;

    let (status, status_code) = if nats_connected {
        ("healthy", StatusCode::OK)
    } else {
        ("unhealthy", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        status_code,
        Json(HealthStatus {
            status: status.to_string(),
            uptime_seconds: uptime,
            nats_connected,
            bot_username: state.bot_username.clone(),
        }),
    )
}

/// Metrics endpoint handler
async fn metrics_handler(State(state): State<AppState>) -> Json<Metrics> {
    Json(state.snapshot().await)
}

/// Readiness check (ready to accept traffic)
async fn ready_handler(State(state): State<AppState>) -> StatusCode {
    if *state.nats_connected.read().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Liveness check (process is alive)
async fn live_handler() -> StatusCode {
    StatusCode::OK
}

/// Create health check router
pub fn create_health_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/ready", get(ready_handler))
        .route("/live", get(live_handler))
        .with_state(state)
}

/// Start health check server
pub async fn start_health_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_health_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Health check server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counters_start_at_zero() {
        let state = AppState::new(Some("wikimapia_bot".into()));
        assert_eq!(state.snapshot().await, Metrics::default());
    }

    #[tokio::test]
    async fn test_counters_increment() {
        let state = AppState::default();
        state.increment_updates_received().await;
        state.increment_updates_received().await;
        state.increment_locations().await;
        state.increment_selections().await;
        state.increment_photos_sent().await;
        state.increment_errors().await;
        state.set_active_sessions(4).await;

        let metrics = state.snapshot().await;
        assert_eq!(metrics.updates_received, 2);
        assert_eq!(metrics.locations_received, 1);
        assert_eq!(metrics.places_selected, 1);
        assert_eq!(metrics.photos_sent, 1);
        assert_eq!(metrics.errors, 1);
        assert_eq!(metrics.active_sessions, 4);
    }

    #[tokio::test]
    async fn test_ready_follows_nats_state() {
        let state = AppState::default();
        assert_eq!(ready_handler(State(state.clone())).await, StatusCode::SERVICE_UNAVAILABLE);

        *state.nats_connected.write().await = true;
        assert_eq!(ready_handler(State(state)).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_bot_username() {
        let state = AppState::new(Some("wikimapia_bot".into()));
        *state.nats_connected.write().await = true;

        let (code, Json(status)) = health_handler(State(state)).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(status.status, "healthy");
        assert_eq!(status.bot_username.as_deref(), Some("wikimapia_bot"));
    }
}
