//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - `/registros` record routes (creation rate limited)
//! - health / heartbeat route
//! - optional Swagger UI / OpenAPI document (disable with `REGISTRO_ENABLE_SWAGGER=false`)
//! - body limit, CORS, security headers and per-request trace ids

pub mod doc;
mod health;
mod registros;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{Router, middleware};
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cors, security, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .merge(registros::router(state.clone()));

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    // Layers added later wrap earlier ones and run first on the way in.
    app = app
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(cors::cors_layer(&state.config));
    for layer in security::header_layers() {
        app = app.layer(layer);
    }
    app.layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}
