//! registro-core: the registry service behind the HTTP API.
//!
//! ```text
//! create ─▶ rate_limit ─▶ validation ─▶ filter ─▶ store
//! update ──────────────▶ validation ─▶ filter ─▶ store
//! list / delete / purge ───────────────────────▶ store
//! ```

pub mod error;
pub mod filter;
pub mod rate_limit;
pub mod service;
pub mod store;

pub use error::RegistryError;
pub use filter::{ContentFilter, FilterError, MaskRule, parse_denylist};
pub use rate_limit::{FixedWindowLimiter, RateDecision, RateLimiter};
pub use service::RegistryService;
pub use store::{RegistroStore, SqliteStore};
