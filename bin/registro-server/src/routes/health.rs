//! Liveness plus a store round trip.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use registro_core::RegistryError;
use registro_types::ErrorBody;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::error::ServerError;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_health), components(schemas(Health)))]
pub struct HealthApi;

#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// 200 when the record store answers a `SELECT 1`, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server and store are up", body = Health),
        (status = 503, description = "Store unreachable", body = ErrorBody)
    )
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> Result<Json<Health>, ServerError> {
    state.registry.ping().await.map_err(|e| match e {
        RegistryError::StoreUnavailable(e) => ServerError::Unavailable(e),
        other => other.into(),
    })?;
    Ok(Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database: "ok",
    }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;
    use registro_core::SqliteStore;

    use crate::config::Config;
    use crate::error::UNAVAILABLE_MESSAGE;

    async fn state() -> (Arc<AppState>, SqliteStore) {
        let store = SqliteStore::in_memory().await.unwrap();
        let state = AppState::new(Config::default(), store.clone()).unwrap();
        (Arc::new(state), store)
    }

    #[tokio::test]
    async fn healthy_store_reports_ok_and_version() {
        let (state, _) = state().await;
        let Json(health) = get_health(State(state)).await.unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.database, "ok");
        assert!(!health.version.is_empty());
    }

    #[tokio::test]
    async fn closed_store_is_503_with_error_body() {
        let (state, store) = state().await;
        store.close().await;

        let response = get_health(State(state)).await.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, UNAVAILABLE_MESSAGE);
        assert!(body.details.is_none());
    }
}
