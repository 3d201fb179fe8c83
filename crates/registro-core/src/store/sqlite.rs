//! SQLite implementation of [`RegistroStore`].
//!
//! Uses [`sqlx`] with the `sqlite` feature. Migrations are run automatically
//! on startup via [`SqliteStore::connect`].
//!
//! # Migrations path
//!
//! `sqlx::migrate!("./migrations")` resolves the path at compile time
//! relative to `CARGO_MANIFEST_DIR`, so the directory is embedded into the
//! binary. The database location is chosen at runtime from the connection
//! string.
//!
//! # Timestamps
//!
//! `created_at` is stored as fixed-width RFC 3339 text with microsecond
//! precision, so ordering by the column text is chronological.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use registro_types::Registro;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::RegistroStore;

type RegistroRow = (i64, String, String);

/// SQLite-backed record store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g. `"sqlite://registros.db"`.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::migrate(pool).await
    }

    /// A private in-memory database, used by tests.
    ///
    /// Every connection to `:memory:` gets its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::migrate(pool).await
    }

    /// Close every pooled connection. Clones share the pool, so they are
    /// closed too and later queries fail with [`sqlx::Error::PoolClosed`].
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_registro((id, contenido, created_at): RegistroRow) -> Registro {
    let created_at = created_at.parse().unwrap_or_else(|e: chrono::ParseError| {
        tracing::warn!(raw = %created_at, error = %e, "failed to parse registro created_at; using now");
        Utc::now()
    });
    Registro {
        id,
        contenido,
        created_at,
    }
}

impl RegistroStore for SqliteStore {
    async fn insert(&self, contenido: &str, created_at: DateTime<Utc>) -> Result<Registro, sqlx::Error> {
        // Stored precision is microseconds; truncate first so the returned
        // record matches what a later read yields.
        let created_at = created_at.trunc_subsecs(6);
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO registros (contenido, created_at) VALUES (?1, ?2) RETURNING id",
        )
        .bind(contenido)
        .bind(encode_timestamp(&created_at))
        .fetch_one(&self.pool)
        .await?;
        Ok(Registro {
            id,
            contenido: contenido.to_owned(),
            created_at,
        })
    }

    async fn list(&self) -> Result<Vec<Registro>, sqlx::Error> {
        let rows: Vec<RegistroRow> = sqlx::query_as(
            "SELECT id, contenido, created_at FROM registros \
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_registro).collect())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn update(&self, id: i64, contenido: &str) -> Result<Option<Registro>, sqlx::Error> {
        let row: Option<RegistroRow> = sqlx::query_as(
            "UPDATE registros SET contenido = ?1 WHERE id = ?2 \
             RETURNING id, contenido, created_at",
        )
        .bind(contenido)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(row_to_registro))
    }

    async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM registros WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_containing(&self, needle: &str) -> Result<u64, sqlx::Error> {
        // instr() is a byte-wise, case-sensitive match, unlike LIKE.
        let result = sqlx::query("DELETE FROM registros WHERE instr(contenido, ?1) > 0")
            .bind(needle)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM registros")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
