//! Public routes: greeting, liveness, readiness, build info. None require a credential.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

/// Liveness and readiness report. `database` is only filled in by `/ready`.
#[derive(Serialize)]
struct ServiceStatus {
    success: bool,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

async fn hello() -> Json<Value> {
    Json(json!({ "success": true, "message": "Hello World!" }))
}

async fn live() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        success: true,
        status: "ok",
        database: None,
    })
}

/// 200 when the pool can run a trivial query, 503 otherwise.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ServiceStatus>) {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ServiceStatus {
                success: true,
                status: "ok",
                database: Some("reachable"),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "database unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ServiceStatus {
                    success: false,
                    status: "degraded",
                    database: Some("unreachable"),
                }),
            )
        }
    }
}

async fn build_info() -> Json<Value> {
    Json(json!({
        "success": true,
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/health", get(live))
        .route("/ready", get(ready))
        .route("/version", get(build_info))
        .with_state(state)
}
