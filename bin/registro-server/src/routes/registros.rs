//! `/registros` CRUD and bulk-delete handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{delete, post, put};
use axum::{Json, Router};
use registro_types::{
    ErrorBody, FieldViolation, MessageResponse, PurgeResponse, PurgeWordPayload, Registro,
    RegistroPayload,
};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::extract::{Id, JsonBody, OptionalJsonBody};
use crate::middleware::rate_limit;
use crate::state::AppState;

pub const DELETED_MESSAGE: &str = "Eliminado correctamente";

#[derive(OpenApi)]
#[openapi(
    paths(
        create_registro,
        list_registros,
        update_registro,
        delete_registro,
        purge_word,
        purge_all
    ),
    components(schemas(
        Registro,
        RegistroPayload,
        PurgeWordPayload,
        MessageResponse,
        PurgeResponse,
        ErrorBody,
        FieldViolation
    ))
)]
pub struct RegistrosApi;

/// Register record routes. Only creation is rate limited.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/registros",
            post(create_registro)
                .route_layer(middleware::from_fn_with_state(
                    state,
                    rate_limit::rate_limit_middleware,
                ))
                .get(list_registros),
        )
        .route("/registros/{id}", put(update_registro).delete(delete_registro))
        .route("/registros/limpiar-palabra", delete(purge_word))
        .route("/registros/limpiar/todo", delete(purge_all))
}

#[utoipa::path(
    post,
    path = "/registros",
    tag = "registros",
    request_body = RegistroPayload,
    responses(
        (status = 201, description = "Record created", body = Registro),
        (status = 400, description = "Invalid content", body = ErrorBody),
        (status = 429, description = "Too many records from this client", body = ErrorBody),
        (status = 500, description = "Store error", body = ErrorBody),
    )
)]
pub async fn create_registro(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<RegistroPayload>,
) -> Result<(StatusCode, Json<Registro>), ServerError> {
    let registro = state.registry.create(payload).await?;
    Ok((StatusCode::CREATED, Json(registro)))
}

#[utoipa::path(
    get,
    path = "/registros",
    tag = "registros",
    responses(
        (status = 200, description = "Every record, newest first", body = Vec<Registro>),
        (status = 500, description = "Store error", body = ErrorBody),
    )
)]
pub async fn list_registros(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Registro>>, ServerError> {
    Ok(Json(state.registry.list().await?))
}

#[utoipa::path(
    put,
    path = "/registros/{id}",
    tag = "registros",
    params(("id" = i64, Path, description = "Record id")),
    request_body = RegistroPayload,
    responses(
        (status = 200, description = "Record updated", body = Registro),
        (status = 400, description = "Invalid id or content", body = ErrorBody),
        (status = 404, description = "No record with this id", body = ErrorBody),
    )
)]
pub async fn update_registro(
    State(state): State<Arc<AppState>>,
    Id(id): Id,
    JsonBody(payload): JsonBody<RegistroPayload>,
) -> Result<Json<Registro>, ServerError> {
    Ok(Json(state.registry.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/registros/{id}",
    tag = "registros",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "No record with this id", body = ErrorBody),
    )
)]
pub async fn delete_registro(
    State(state): State<Arc<AppState>>,
    Id(id): Id,
) -> Result<Json<MessageResponse>, ServerError> {
    state.registry.delete(id).await?;
    Ok(Json(MessageResponse {
        message: DELETED_MESSAGE.to_owned(),
    }))
}

/// Delete every record whose content contains `palabra` (case-sensitive).
///
/// The body is optional at the HTTP level so that a bare `DELETE` gets the
/// same "palabra required" answer as an empty word.
#[utoipa::path(
    delete,
    path = "/registros/limpiar-palabra",
    tag = "registros",
    request_body = PurgeWordPayload,
    responses(
        (status = 200, description = "Matching records deleted", body = PurgeResponse),
        (status = 400, description = "Missing or empty palabra", body = ErrorBody),
    )
)]
pub async fn purge_word(
    State(state): State<Arc<AppState>>,
    OptionalJsonBody(payload): OptionalJsonBody<PurgeWordPayload>,
) -> Result<Json<PurgeResponse>, ServerError> {
    let palabra = payload.palabra.as_deref();
    let count = state.registry.delete_containing(palabra).await?;
    Ok(Json(PurgeResponse {
        message: format!(
            "¡Limpieza exitosa! Se eliminaron {count} registros que contenían \"{}\".",
            palabra.unwrap_or_default()
        ),
        count,
    }))
}

/// Delete every record. Confirmation is the client's job.
#[utoipa::path(
    delete,
    path = "/registros/limpiar/todo",
    tag = "registros",
    responses(
        (status = 200, description = "All records deleted", body = PurgeResponse),
        (status = 500, description = "Store error", body = ErrorBody),
    )
)]
pub async fn purge_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PurgeResponse>, ServerError> {
    let count = state.registry.delete_all().await?;
    Ok(Json(PurgeResponse {
        message: format!("Se eliminaron todos los registros ({count})."),
        count,
    }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
