use std::sync::Arc;

use crate::database::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(db: Database, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            db,
            jwt_secret: jwt_secret.into(),
        }
    }
}
