//! Calldeck — headless core of a multi-tenant patient-call dashboard.
//!
//! Everything a frontend shell needs short of pixels: schema-driven
//! table and form state, call-session views, status polling, optimistic
//! call starts, and a typed client for the dashboard API. The embedding
//! UI owns rendering and the event loop; this crate owns the state and
//! the flows that mutate it.

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod format;
pub mod models;
pub mod schema_cache;
pub mod screen; // table + form + polling composed per workflow
pub mod session_view;
pub mod store;
pub mod table;
pub mod transcript;

pub use error::DashboardError;
pub use schema_cache::SchemaCache;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for an embedding binary. `RUST_LOG` wins over the
/// crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
