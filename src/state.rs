use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::store::{InMemoryStore, PgStore, TaskStore, UserStore};

/// Shared state handed to every handler through `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub config: Arc<Config>,
    /// Name of the backing store, reported by `/health`.
    pub backend: &'static str,
}

impl AppState {
    pub fn postgres(pool: PgPool, config: Config) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            users: store.clone(),
            tasks: store,
            config: Arc::new(config),
            backend: "postgres",
        }
    }

    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            tasks: store,
            config: Arc::new(config),
            backend: "memory",
        }
    }
}
