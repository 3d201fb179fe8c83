//! The registry service: validation, content filtering, throttling, and
//! persistence composed into the operations the API exposes.
//!
//! Create: rate limiter ([`RegistryService::admit`]) → validation → content
//! filter → store. The HTTP layer calls `admit` from middleware in front of
//! body parsing, so malformed requests still count against the window.
//!
//! Update and delete run a single statement each. There is no version check,
//! so a concurrent update and delete on the same id race and the last one to
//! reach the store wins.

use std::sync::Arc;

use chrono::Utc;
use registro_types::validation::{self, ValidationFailure};
use registro_types::{Registro, RegistroPayload};
use tracing::{debug, info, warn};

use crate::error::RegistryError;
use crate::filter::ContentFilter;
use crate::rate_limit::{RateDecision, RateLimiter};
use crate::store::RegistroStore;

pub const PALABRA_REQUIRED_MESSAGE: &str = "Debes especificar una palabra para eliminar.";

pub struct RegistryService<S> {
    store: S,
    filter: ContentFilter,
    limiter: Arc<dyn RateLimiter>,
}

impl<S> std::fmt::Debug for RegistryService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RegistryService(filter rules: {}, limit: {}/{}s)",
            self.filter.len(),
            self.limiter.limit(),
            self.limiter.window().as_secs()
        )
    }
}

impl<S: RegistroStore> RegistryService<S> {
    pub fn new(store: S, filter: ContentFilter, limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            store,
            filter,
            limiter,
        }
    }

    pub fn limiter(&self) -> &dyn RateLimiter {
        self.limiter.as_ref()
    }

    /// Count one creation attempt for `client`.
    ///
    /// Returns how many more creations the client may make in this window.
    pub fn admit(&self, client: &str) -> Result<u32, RegistryError> {
        match self.limiter.check(client) {
            RateDecision::Allowed { remaining } => Ok(remaining),
            RateDecision::Limited { retry_after } => {
                warn!(client = %client, retry_after_secs = retry_after.as_secs(), "rate limit exceeded");
                Err(RegistryError::RateLimitExceeded {
                    retry_after,
                    window: self.limiter.window(),
                })
            }
        }
    }

    pub async fn create(&self, payload: RegistroPayload) -> Result<Registro, RegistryError> {
        let contenido = self.prepare(&payload)?;
        let registro = self.store.insert(&contenido, Utc::now()).await?;
        info!(id = registro.id, filtered = contenido != payload.contenido, "registro created");
        Ok(registro)
    }

    pub async fn list(&self) -> Result<Vec<Registro>, RegistryError> {
        Ok(self.store.list().await?)
    }

    pub async fn update(&self, id: i64, payload: RegistroPayload) -> Result<Registro, RegistryError> {
        let contenido = self.prepare(&payload)?;
        let registro = self
            .store
            .update(id, &contenido)
            .await?
            .ok_or(RegistryError::NotFound(id))?;
        info!(id, "registro updated");
        Ok(registro)
    }

    pub async fn delete(&self, id: i64) -> Result<(), RegistryError> {
        if !self.store.delete(id).await? {
            return Err(RegistryError::NotFound(id));
        }
        info!(id, "registro deleted");
        Ok(())
    }

    /// Delete every record containing `palabra` (case-sensitive).
    pub async fn delete_containing(&self, palabra: Option<&str>) -> Result<u64, RegistryError> {
        let palabra = match palabra {
            Some(p) if !p.is_empty() => p,
            _ => {
                return Err(ValidationFailure::required("palabra", PALABRA_REQUIRED_MESSAGE).into());
            }
        };
        let count = self.store.delete_containing(palabra).await?;
        info!(palabra = %palabra, count, "registros purged by word");
        Ok(count)
    }

    pub async fn delete_all(&self) -> Result<u64, RegistryError> {
        let count = self.store.delete_all().await?;
        warn!(count, "all registros deleted");
        Ok(count)
    }

    /// Check that the store still answers.
    pub async fn ping(&self) -> Result<(), RegistryError> {
        self.store.ping().await?;
        Ok(())
    }

    /// Validate, then filter. Returns the content to persist.
    fn prepare(&self, payload: &RegistroPayload) -> Result<String, RegistryError> {
        if let Err(failure) = validation::check(payload) {
            debug!(error = %failure, "payload rejected");
            return Err(failure.into());
        }
        Ok(self.filter.apply(&payload.contenido).into_owned())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
