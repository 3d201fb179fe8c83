//! HTTP access to the `/registros` API.

use std::future::Future;
use std::time::Duration;

use registro_types::{
    ErrorBody, MessageResponse, PurgeResponse, PurgeWordPayload, Registro, RegistroPayload,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;

/// Server address used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The operations the application needs from the server.
///
/// [`RegistroClient`] is the HTTP implementation; tests substitute an
/// in-memory one.
pub trait RegistroApi: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<Registro>, ClientError>> + Send;

    fn create(&self, contenido: &str) -> impl Future<Output = Result<Registro, ClientError>> + Send;

    fn update(
        &self,
        id: i64,
        contenido: &str,
    ) -> impl Future<Output = Result<Registro, ClientError>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<MessageResponse, ClientError>> + Send;

    fn purge_word(
        &self,
        palabra: &str,
    ) -> impl Future<Output = Result<PurgeResponse, ClientError>> + Send;

    fn purge_all(&self) -> impl Future<Output = Result<PurgeResponse, ClientError>> + Send;
}

#[derive(Debug, Clone)]
pub struct RegistroClient {
    http: Client,
    base_url: String,
}

impl RegistroClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Use a preconfigured [`reqwest::Client`].
    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/registros{}", self.base_url, path)
    }
}

/// Decode a 2xx body, or turn an error response into [`ClientError::Api`].
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let text = resp.text().await?;
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) if text.is_empty() => status.to_string(),
        Err(_) => text,
    };
    debug!(status = status.as_u16(), %message, "request rejected");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

impl RegistroApi for RegistroClient {
    async fn list(&self) -> Result<Vec<Registro>, ClientError> {
        decode(self.http.get(self.url("")).send().await?).await
    }

    async fn create(&self, contenido: &str) -> Result<Registro, ClientError> {
        let resp = self
            .http
            .post(self.url(""))
            .json(&RegistroPayload::new(contenido))
            .send()
            .await?;
        decode(resp).await
    }

    async fn update(&self, id: i64, contenido: &str) -> Result<Registro, ClientError> {
        let resp = self
            .http
            .put(self.url(&format!("/{id}")))
            .json(&RegistroPayload::new(contenido))
            .send()
            .await?;
        decode(resp).await
    }

    async fn delete(&self, id: i64) -> Result<MessageResponse, ClientError> {
        decode(self.http.delete(self.url(&format!("/{id}"))).send().await?).await
    }

    async fn purge_word(&self, palabra: &str) -> Result<PurgeResponse, ClientError> {
        let payload = PurgeWordPayload {
            palabra: Some(palabra.to_owned()),
        };
        let resp = self
            .http
            .delete(self.url("/limpiar-palabra"))
            .json(&payload)
            .send()
            .await?;
        decode(resp).await
    }

    async fn purge_all(&self) -> Result<PurgeResponse, ClientError> {
        decode(self.http.delete(self.url("/limpiar/todo")).send().await?).await
    }
}
