//! The single data-access surface of the store.
//!
//! Every method issues one parameterized statement. Database failures are
//! logged here and surface to callers only as `false`, `None`, an empty list
//! or [`Rating::Unrated`](crate::models::Rating::Unrated).

mod accounts;
mod manufacturers;
mod products;
mod reviews;
mod transactions;

use std::sync::Arc;

use sea_orm::DbErr;

use crate::{cache::ScalarCache, db::OrmConn};

#[derive(Clone)]
pub struct Database {
    conn: Arc<OrmConn>,
    cache: Arc<ScalarCache>,
}

impl Database {
    /// Accepts an owned connection or one already shared with the caller.
    pub fn new(conn: impl Into<Arc<OrmConn>>, cache: ScalarCache) -> Self {
        Self {
            conn: conn.into(),
            cache: Arc::new(cache),
        }
    }

    pub fn connection(&self) -> &OrmConn {
        &self.conn
    }

    pub fn cache(&self) -> &ScalarCache {
        &self.cache
    }
}

fn log_failure(operation: &'static str, err: &DbErr) {
    tracing::error!(operation, error = %err, "database operation failed");
}

fn succeeded<T>(operation: &'static str, result: Result<T, DbErr>) -> bool {
    match result {
        Ok(_) => true,
        Err(err) => {
            log_failure(operation, &err);
            false
        }
    }
}

fn found<T>(operation: &'static str, result: Result<Option<T>, DbErr>) -> Option<T> {
    result.unwrap_or_else(|err| {
        log_failure(operation, &err);
        None
    })
}

fn listed<T>(operation: &'static str, result: Result<Vec<T>, DbErr>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        log_failure(operation, &err);
        Vec::new()
    })
}

/// Present and not empty.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
