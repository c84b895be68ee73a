//! User service configuration.

use std::fmt;
use std::str::FromStr;

use common::{env_var, first_set, flag_or, DatabaseConfig};

/// Where user records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "database" | "db" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" | "inmemory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Postgres => write!(f, "postgres"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// User service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserServiceConfig {
    pub database: DatabaseConfig,
    pub storage: StorageBackend,
    /// Insert the sample users into an empty store at startup
    pub seed_sample_data: bool,
}

impl UserServiceConfig {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match first_set(lookup, &["STORAGE_BACKEND"]) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, using postgres", e);
                StorageBackend::Postgres
            }),
            None => StorageBackend::default(),
        };

        Self {
            database: DatabaseConfig::from_lookup(lookup),
            storage,
            seed_sample_data: flag_or(lookup, "SEED_SAMPLE_DATA", true),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(&env_var)
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            storage: StorageBackend::default(),
            seed_sample_data: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UserServiceConfig::from_lookup(&|_: &str| None);
        assert_eq!(config, UserServiceConfig::default());
    }

    #[test]
    fn test_memory_backend_without_seed() {
        let config = UserServiceConfig::from_lookup(&|key: &str| match key {
            "STORAGE_BACKEND" => Some("memory".to_string()),
            "SEED_SAMPLE_DATA" => Some("false".to_string()),
            _ => None,
        });
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(!config.seed_sample_data);
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("In-Memory".parse(), Ok(StorageBackend::Memory));
        assert_eq!("postgresql".parse(), Ok(StorageBackend::Postgres));
        assert!("mysql".parse::<StorageBackend>().is_err());
    }
}
