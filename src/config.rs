use std::{env, str::FromStr, time::Duration};

use sqlx::postgres::PgConnectOptions;

/// Connection settings for the store database.
///
/// `DATABASE_URL` wins when present; otherwise the connection is built from
/// the individual `DB_*` variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub pool_size: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()),
            host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: parse_var("DB_PORT").unwrap_or(5432),
            name: env::var("DB_NAME").unwrap_or_else(|_| "webstore".to_string()),
            user: env::var("DB_USER").unwrap_or_else(|_| "webstore".to_string()),
            password: env::var("DB_PASSWORD").unwrap_or_default(),
            pool_size: parse_var("DB_POOL_SIZE").unwrap_or(10).max(1),
        }
    }

    /// Credentials are passed as-is, so they may contain URL delimiters.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.url {
            Some(url) => PgConnectOptions::from_str(url),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .database(&self.name)
                .username(&self.user)
                .password(&self.password)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub cache_refresh: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("APP_PORT").unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let cache_refresh = Duration::from_secs(parse_var("CACHE_REFRESH_SECS").unwrap_or(600));
        Ok(Self {
            database: DatabaseConfig::from_env(),
            host,
            port,
            jwt_secret,
            cache_refresh,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DatabaseConfig {
        DatabaseConfig {
            url: None,
            host: "db.internal".into(),
            port: 5433,
            name: "shop".into(),
            user: "clerk".into(),
            password: "s3cret".into(),
            pool_size: 4,
        }
    }

    #[test]
    fn builds_options_from_parts() {
        let options = sample().connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("shop"));
        assert_eq!(options.get_username(), "clerk");
    }

    #[test]
    fn url_delimiters_in_credentials_do_not_leak_into_host() {
        let config = DatabaseConfig {
            user: "clerk@front:desk".into(),
            password: "p@ss:w/rd#1".into(),
            ..sample()
        };
        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_username(), "clerk@front:desk");
    }

    #[test]
    fn explicit_url_takes_precedence() {
        let config = DatabaseConfig {
            url: Some("postgres://other:7777/db".into()),
            ..sample()
        };
        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "other");
        assert_eq!(options.get_port(), 7777);
        assert_eq!(options.get_database(), Some("db"));
    }
}
