//! `RegistroClient` against a throwaway axum server that speaks the
//! `/registros` wire format.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post, put};
use axum::{Json, Router};
use chrono::Utc;
use registro_client::{ClientError, RegistroApi, RegistroApp, RegistroClient};
use registro_types::{
    ErrorBody, MessageResponse, PurgeResponse, PurgeWordPayload, Registro, RegistroPayload,
};

#[derive(Default)]
struct Mock {
    registros: Mutex<Vec<Registro>>,
    next_id: Mutex<i64>,
}

type Shared = Arc<Mock>;
type Reply<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error: message.to_owned(),
            details: None,
        }),
    )
}

async fn list(State(mock): State<Shared>) -> Json<Vec<Registro>> {
    Json(mock.registros.lock().unwrap().clone())
}

async fn create(
    State(mock): State<Shared>,
    Json(payload): Json<RegistroPayload>,
) -> Result<(StatusCode, Json<Registro>), (StatusCode, Json<ErrorBody>)> {
    if payload.contenido.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "El campo no puede estar vacío"));
    }
    let mut next = mock.next_id.lock().unwrap();
    *next += 1;
    let r = Registro {
        id: *next,
        contenido: payload.contenido,
        created_at: Utc::now(),
    };
    mock.registros.lock().unwrap().insert(0, r.clone());
    Ok((StatusCode::CREATED, Json(r)))
}

async fn update(
    State(mock): State<Shared>,
    Path(id): Path<i64>,
    Json(payload): Json<RegistroPayload>,
) -> Reply<Registro> {
    let mut all = mock.registros.lock().unwrap();
    match all.iter_mut().find(|r| r.id == id) {
        Some(r) => {
            r.contenido = payload.contenido;
            Ok(Json(r.clone()))
        }
        None => Err(error(StatusCode::NOT_FOUND, "Registro no encontrado")),
    }
}

async fn remove(State(mock): State<Shared>, Path(id): Path<i64>) -> Reply<MessageResponse> {
    let mut all = mock.registros.lock().unwrap();
    let before = all.len();
    all.retain(|r| r.id != id);
    if all.len() == before {
        return Err(error(StatusCode::NOT_FOUND, "Registro no encontrado"));
    }
    Ok(Json(MessageResponse {
        message: "Eliminado correctamente".to_owned(),
    }))
}

async fn purge_word(
    State(mock): State<Shared>,
    Json(payload): Json<PurgeWordPayload>,
) -> Reply<PurgeResponse> {
    let palabra = payload.palabra.unwrap_or_default();
    if palabra.is_empty() {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "Debes especificar una palabra para eliminar.",
        ));
    }
    let mut all = mock.registros.lock().unwrap();
    let before = all.len();
    all.retain(|r| !r.contenido.contains(&palabra));
    let count = (before - all.len()) as u64;
    Ok(Json(PurgeResponse {
        message: format!("{count} eliminados"),
        count,
    }))
}

async fn purge_all(State(mock): State<Shared>) -> Json<PurgeResponse> {
    let mut all = mock.registros.lock().unwrap();
    let count = all.len() as u64;
    all.clear();
    Json(PurgeResponse {
        message: format!("{count} eliminados"),
        count,
    })
}

/// Start the mock on an ephemeral port and return its base URL.
async fn spawn_mock() -> String {
    let app = Router::new()
        .route("/registros", post(create).get(list))
        .route("/registros/{id}", put(update).delete(remove))
        .route("/registros/limpiar-palabra", delete(purge_word))
        .route("/registros/limpiar/todo", delete(purge_all))
        .with_state(Shared::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn crud_round_trip_over_http() {
    let client = RegistroClient::new(&spawn_mock().await).unwrap();
    assert!(!client.base_url().ends_with('/'));

    let created = client.create("hello").await.unwrap();
    assert_eq!(created.contenido, "hello");
    assert_eq!(client.list().await.unwrap(), vec![created.clone()]);

    let updated = client.update(created.id, "world").await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.contenido, "world");

    let deleted = client.delete(created.id).await.unwrap();
    assert_eq!(deleted.message, "Eliminado correctamente");
    assert!(client.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn error_bodies_become_api_errors() {
    let client = RegistroClient::new(&spawn_mock().await).unwrap();

    match client.delete(99).await.unwrap_err() {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Registro no encontrado");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = client.create(" ").await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    let err = client.purge_word("").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn bulk_deletes_report_counts() {
    let client = RegistroClient::new(&spawn_mock().await).unwrap();
    for s in ["axe", "box", "cat"] {
        client.create(s).await.unwrap();
    }
    assert_eq!(client.purge_word("x").await.unwrap().count, 2);
    assert_eq!(client.purge_all().await.unwrap().count, 1);
    assert!(client.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn app_drives_the_server() {
    let client = RegistroClient::new(&spawn_mock().await).unwrap();
    let mut app = RegistroApp::new(client);

    for i in 0..21 {
        app.submit(&format!("nota {i}")).await.unwrap();
    }
    assert_eq!(app.registros().len(), 21);
    assert_eq!(app.page_count(), 2);
    assert_eq!(app.set_page(2), 2);
    assert_eq!(app.current_page().len(), 1);

    assert!(matches!(app.submit("<script>x</script>").await, Err(ClientError::Locked)));
    app.reload().await.unwrap();
    assert_eq!(app.page(), 1);
    assert_eq!(app.registros().len(), 21);
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    // Bind and drop to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RegistroClient::new(&format!("http://{addr}")).unwrap();
    assert!(matches!(client.list().await, Err(ClientError::Http(_))));
}
