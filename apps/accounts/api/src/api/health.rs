//! Readiness check backed by the actual database connection.

use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use serde_json::json;

/// `GET /ready`: 503 while PostgreSQL is unreachable
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let Some(db) = state.db.as_ref() else {
        let (status, Json(mut body)) = run_health_checks(Vec::new()).await;
        body["database"] = json!("in-memory");
        return (status, Json(body)).into_response();
    };

    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(db)
                .await
                .map_err(|e| format!("Database ping failed: {}", e))
        }),
    )];

    run_health_checks(checks).await.into_response()
}
