use std::sync::Arc;

use chrono::Duration;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn, create_orm_conn},
    session::SessionStore,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub sessions: SessionStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let orm = create_orm_conn(&pool);
        let sessions = SessionStore::new(Duration::minutes(config.session_ttl_minutes));
        Self {
            pool,
            orm,
            sessions,
            config: Arc::new(config),
        }
    }
}
