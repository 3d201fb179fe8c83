//! Application controller: the state behind a registro front end.
//!
//! The record list is always refetched in full after a mutation. Input is
//! checked locally before it is sent: blank text is ignored, over-long text
//! is rejected, and text tripping the [`InjectionGuard`] locks the session
//! until [`RegistroApp::reload`].

use registro_types::validation;
use registro_types::{PurgeResponse, Registro, RegistroPayload};
use tracing::{info, warn};

use crate::client::RegistroApi;
use crate::error::ClientError;
use crate::guard::InjectionGuard;
use crate::pagination::Paginator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Ready,
    Locked,
}

#[derive(Debug)]
pub struct RegistroApp<A> {
    api: A,
    paginator: Paginator,
    guard: InjectionGuard,
    registros: Vec<Registro>,
    page: usize,
    session: Session,
}

impl<A: RegistroApi> RegistroApp<A> {
    pub fn new(api: A) -> Self {
        Self::with_parts(api, Paginator::default(), InjectionGuard::default())
    }

    pub fn with_parts(api: A, paginator: Paginator, guard: InjectionGuard) -> Self {
        Self {
            api,
            paginator,
            guard,
            registros: Vec::new(),
            page: 1,
            session: Session::Ready,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn is_locked(&self) -> bool {
        self.session == Session::Locked
    }

    /// Every fetched record, newest first.
    pub fn registros(&self) -> &[Registro] {
        &self.registros
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.paginator.page_count(self.registros.len())
    }

    /// Records on the current page.
    pub fn current_page(&self) -> &[Registro] {
        self.paginator.page(&self.registros, self.page)
    }

    /// Jump to `page`, clamped. Returns the page actually selected.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = self.paginator.clamp(page, self.registros.len());
        self.page
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> usize {
        self.set_page(self.page.saturating_sub(1))
    }

    /// Fetch the full list and keep the current page in range.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.ensure_ready()?;
        self.registros = self.api.list().await?;
        self.page = self.paginator.clamp(self.page, self.registros.len());
        Ok(())
    }

    /// Start a fresh session: unlock, go back to page 1 and refetch.
    pub async fn reload(&mut self) -> Result<(), ClientError> {
        self.session = Session::Ready;
        self.registros.clear();
        self.page = 1;
        self.load().await
    }

    /// Create a record. `Ok(None)` when `text` is blank and nothing was sent.
    pub async fn submit(&mut self, text: &str) -> Result<Option<Registro>, ClientError> {
        if !self.check_input(text)? {
            return Ok(None);
        }
        let registro = self.api.create(text).await?;
        self.load().await?;
        Ok(Some(registro))
    }

    /// Replace the content of `id`. `Ok(None)` when `text` is blank.
    pub async fn edit(&mut self, id: i64, text: &str) -> Result<Option<Registro>, ClientError> {
        if !self.check_input(text)? {
            return Ok(None);
        }
        let registro = self.api.update(id, text).await?;
        self.load().await?;
        Ok(Some(registro))
    }

    pub async fn remove(&mut self, id: i64) -> Result<(), ClientError> {
        self.ensure_ready()?;
        self.api.delete(id).await?;
        self.load().await
    }

    pub async fn purge_word(&mut self, palabra: &str) -> Result<PurgeResponse, ClientError> {
        self.ensure_ready()?;
        self.screen(palabra)?;
        let response = self.api.purge_word(palabra).await?;
        self.load().await?;
        Ok(response)
    }

    /// Delete everything. Refused unless `confirmed`.
    pub async fn purge_all(&mut self, confirmed: bool) -> Result<PurgeResponse, ClientError> {
        self.ensure_ready()?;
        if !confirmed {
            return Err(ClientError::NotConfirmed);
        }
        let response = self.api.purge_all().await?;
        self.load().await?;
        Ok(response)
    }

    fn ensure_ready(&self) -> Result<(), ClientError> {
        match self.session {
            Session::Ready => Ok(()),
            Session::Locked => Err(ClientError::Locked),
        }
    }

    fn screen(&mut self, text: &str) -> Result<(), ClientError> {
        if self.guard.is_suspicious(text) {
            warn!("suspicious input; locking session");
            self.session = Session::Locked;
            return Err(ClientError::Locked);
        }
        Ok(())
    }

    /// `Ok(false)` for blank input, an error for locked sessions, flagged
    /// input and content that would fail server validation.
    fn check_input(&mut self, text: &str) -> Result<bool, ClientError> {
        self.ensure_ready()?;
        self.screen(text)?;
        if text.trim().is_empty() {
            info!("blank input ignored");
            return Ok(false);
        }
        validation::check(&RegistroPayload::new(text))?;
        Ok(true)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
