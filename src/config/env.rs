use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    DatabaseUrl,
    DbMaxConnections,
    DbMinConnections,
    DbAcquireTimeoutSecs,
    RequestTimeoutSecs,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::DbMaxConnections => "DB_MAX_CONNECTIONS",
            EnvKey::DbMinConnections => "DB_MIN_CONNECTIONS",
            EnvKey::DbAcquireTimeoutSecs => "DB_ACQUIRE_TIMEOUT_SECS",
            EnvKey::RequestTimeoutSecs => "REQUEST_TIMEOUT_SECS",
        }
    }
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match env::var(key.as_str()) {
        Ok(val) => val.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
