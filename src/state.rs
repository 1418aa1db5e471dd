use sqlx::PgPool;

use crate::config::AppConfig;

/// Shared per-worker state. The pool is `None` when DATABASE_URL was absent
/// at startup; handlers turn that into a configuration error response.
#[derive(Clone)]
pub struct AppState {
    pub pool: Option<PgPool>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(pool: Option<PgPool>, config: AppConfig) -> Self {
        Self { pool, config }
    }
}
