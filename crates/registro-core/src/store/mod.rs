//! Database abstraction layer.
//!
//! [`RegistroStore`] defines the interface for persisting records. The default
//! implementation is [`sqlite::SqliteStore`]. To swap to another database,
//! implement [`RegistroStore`] for the new type and change the concrete type
//! held by the server state.
//!
//! All trait methods use `impl Future` in their signatures so no extra
//! `async-trait` crate is required.

pub mod sqlite;

use std::future::Future;

use chrono::{DateTime, Utc};
use registro_types::Registro;

pub use sqlite::SqliteStore;

/// Trait for persisting registry records.
///
/// Every method maps to a single SQL statement; none of them spans a
/// read-then-write sequence.
pub trait RegistroStore: Send + Sync + 'static {
    /// Insert a record and return it with its store-assigned id.
    fn insert(
        &self,
        contenido: &str,
        created_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Registro, sqlx::Error>> + Send;

    /// All records, newest first (`created_at DESC, id DESC`).
    fn list(&self) -> impl Future<Output = Result<Vec<Registro>, sqlx::Error>> + Send;

    /// Round-trip a trivial statement to prove the store is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Replace the content of `id`. `None` when no such record exists.
    fn update(
        &self,
        id: i64,
        contenido: &str,
    ) -> impl Future<Output = Result<Option<Registro>, sqlx::Error>> + Send;

    /// Remove `id`. Returns `false` when nothing was deleted.
    fn delete(&self, id: i64) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;

    /// Remove every record whose content contains `needle` (case-sensitive).
    fn delete_containing(
        &self,
        needle: &str,
    ) -> impl Future<Output = Result<u64, sqlx::Error>> + Send;

    /// Remove every record.
    fn delete_all(&self) -> impl Future<Output = Result<u64, sqlx::Error>> + Send;
}
