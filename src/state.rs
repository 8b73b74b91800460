use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::db::OrmConn;

/// Signing material for session tokens.
#[derive(Debug, Clone)]
pub struct SessionKeys {
    pub secret: Arc<str>,
    pub ttl_hours: i64,
}

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub session: SessionKeys,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, secret: &str, ttl_hours: i64) -> Self {
        Self {
            orm,
            session: SessionKeys {
                secret: Arc::from(secret),
                ttl_hours,
            },
        }
    }
}
