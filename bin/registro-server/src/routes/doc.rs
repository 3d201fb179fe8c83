use utoipa::OpenApi;

use crate::routes::{health, registros};

#[derive(OpenApi)]
#[openapi(info(
    title = "registro-server",
    description = "Text registry API",
    version = "0.1.0"
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(registros::RegistrosApi::openapi());
    root
}
