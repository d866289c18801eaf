use std::sync::Arc;

use crate::config::Config;
use crate::equipment::Catalog;
use crate::store::GuildStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Data-access capability. `PgGuildStore` in production.
    pub store: Arc<dyn GuildStore>,
    /// Item catalog, loaded once at startup and never mutated.
    pub catalog: Arc<Catalog>,
    #[allow(dead_code)]
    pub config: Config,
}
