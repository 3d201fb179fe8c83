//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use anyhow::Context;
use registro_core::{
    ContentFilter, FixedWindowLimiter, RegistryService, SqliteStore, parse_denylist,
};

use crate::config::Config;

/// State shared across all HTTP handlers and middleware.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Registry operations over the record store.
    pub registry: Arc<RegistryService<SqliteStore>>,
}

impl AppState {
    /// Wire the registry service from `config` on top of an open store.
    pub fn new(config: Config, store: SqliteStore) -> anyhow::Result<Self> {
        let rules = match &config.denylist {
            Some(spec) => parse_denylist(spec).context("REGISTRO_DENYLIST")?,
            None => Vec::new(),
        };
        let filter = ContentFilter::new(rules).context("REGISTRO_DENYLIST")?;
        let limiter = FixedWindowLimiter::new(config.rate_limit_max, config.rate_limit_window);

        Ok(Self {
            config: Arc::new(config),
            registry: Arc::new(RegistryService::new(store, filter, Arc::new(limiter))),
        })
    }
}
