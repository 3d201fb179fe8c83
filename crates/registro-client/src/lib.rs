//! registro-client: talks to registro-server and drives the user-facing
//! flows (local validation, paging, injection lock).

pub mod app;
pub mod client;
pub mod error;
pub mod guard;
pub mod pagination;

pub use app::RegistroApp;
pub use client::{DEFAULT_API_URL, RegistroApi, RegistroClient};
pub use error::ClientError;
pub use guard::InjectionGuard;
pub use pagination::Paginator;
