//! Configuration management
//!
//! Settings are resolved in this order:
//! 1. Environment variables (`CX_*`)
//! 2. `cx-contacts.toml` in the working directory
//! 3. Defaults
//!
//! `${VAR_NAME}` inside the TOML file is replaced by the environment value.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, ContactError};
use crate::store::{ContactStore, MemoryContactStore, SqliteContactStore, UnsupportedStore};

/// Default config file name
pub const CONFIG_FILE: &str = "cx-contacts.toml";

/// Store backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// SQLite database file
    #[default]
    Sqlite,
    /// Process memory; contents are lost on exit
    Memory,
    /// No contacts capability
    Unsupported,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StoreKind::Sqlite),
            "memory" => Ok(StoreKind::Memory),
            "unsupported" | "none" => Ok(StoreKind::Unsupported),
            other => Err(ConfigError::Invalid {
                key: "store".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Whether the user has granted access to the address book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessPolicy {
    #[default]
    Granted,
    Denied,
}

impl FromStr for AccessPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "granted" | "true" | "yes" => Ok(AccessPolicy::Granted),
            "denied" | "false" | "no" => Ok(AccessPolicy::Denied),
            other => Err(ConfigError::Invalid {
                key: "access".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Contacts configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactsConfig {
    /// Store backend
    #[serde(default)]
    pub store: StoreKind,

    /// Path to SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Upper bound for a single store operation; 0 disables it
    #[serde(default = "default_operation_timeout_secs")]
    pub operation_timeout_secs: u64,

    /// Address book access
    #[serde(default)]
    pub access: AccessPolicy,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::default(),
            db_path: default_db_path(),
            operation_timeout_secs: default_operation_timeout_secs(),
            access: AccessPolicy::default(),
        }
    }
}

fn default_db_path() -> String {
    "data/cx-contacts.db".to_string()
}

fn default_operation_timeout_secs() -> u64 {
    30
}

impl ContactsConfig {
    /// Replace `${VAR_NAME}` with values from `lookup`; unknown names become empty
    fn expand_vars(value: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Some(env_value) = lookup(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Parse TOML text, expanding variables through `lookup`
    fn from_toml_str(
        content: &str,
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let expanded = Self::expand_vars(content, lookup);
        let toml: TomlConfig = toml::from_str(&expanded)?;

        let store = toml.store.unwrap_or_default();
        let client = toml.client.unwrap_or_default();

        Ok(Self {
            store: store.backend.unwrap_or_default(),
            db_path: store.db_path.unwrap_or_else(default_db_path),
            operation_timeout_secs: client
                .operation_timeout_secs
                .unwrap_or_else(default_operation_timeout_secs),
            access: store.access.unwrap_or_default(),
        })
    }

    /// Load from a TOML file, then apply environment overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let env = |key: &str| std::env::var(key).ok();

        let mut config = Self::from_toml_str(&content, &env)?;
        config.apply_overrides(&env)?;
        info!("Loaded contacts configuration from {}", path.display());
        Ok(config)
    }

    /// Load `cx-contacts.toml` if present, otherwise defaults plus environment
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }
        let mut config = Self::default();
        config.apply_overrides(&|key: &str| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `CX_STORE`, `CX_DB_PATH`, `CX_OPERATION_TIMEOUT` and `CX_ACCESS`
    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(store) = lookup("CX_STORE").filter(|s| !s.is_empty()) {
            self.store = store.parse()?;
        }
        if let Some(path) = lookup("CX_DB_PATH").filter(|s| !s.is_empty()) {
            self.db_path = path;
        }
        if let Some(secs) = lookup("CX_OPERATION_TIMEOUT").filter(|s| !s.is_empty()) {
            self.operation_timeout_secs = secs.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "CX_OPERATION_TIMEOUT".to_string(),
                value: secs.clone(),
            })?;
        }
        if let Some(access) = lookup("CX_ACCESS").filter(|s| !s.is_empty()) {
            self.access = access.parse()?;
        }
        Ok(())
    }

    /// Per-operation timeout, `None` when disabled
    pub fn operation_timeout(&self) -> Option<Duration> {
        (self.operation_timeout_secs > 0).then(|| Duration::from_secs(self.operation_timeout_secs))
    }

    /// Open the configured store backend
    pub fn open_store(&self) -> crate::Result<Arc<dyn ContactStore>> {
        let store: Arc<dyn ContactStore> = match self.store {
            StoreKind::Sqlite => {
                let mut sqlite = SqliteContactStore::new(&self.db_path)
                    .map_err(ContactError::from)?
                    .with_access(self.access);
                if let Some(timeout) = self.operation_timeout() {
                    sqlite = sqlite.with_busy_timeout(timeout).map_err(ContactError::from)?;
                }
                Arc::new(sqlite)
            }
            StoreKind::Memory => Arc::new(MemoryContactStore::new().with_access(self.access)),
            StoreKind::Unsupported => Arc::new(UnsupportedStore),
        };
        info!("Using {} contact store", store.name());
        Ok(store)
    }
}

// ============================================================================
// TOML file layout
// ============================================================================

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    store: Option<TomlStoreConfig>,
    client: Option<TomlClientConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlStoreConfig {
    #[serde(default)]
    backend: Option<StoreKind>,
    #[serde(default)]
    db_path: Option<String>,
    #[serde(default)]
    access: Option<AccessPolicy>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlClientConfig {
    #[serde(default)]
    operation_timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ContactsConfig::default();
        assert_eq!(config.store, StoreKind::Sqlite);
        assert_eq!(config.db_path, "data/cx-contacts.db");
        assert_eq!(config.operation_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.access, AccessPolicy::Granted);
    }

    #[test]
    fn test_expand_vars() {
        let lookup = vars(&[("CX_TEST_VAR", "test_value")]);
        assert_eq!(
            ContactsConfig::expand_vars("prefix_${CX_TEST_VAR}_suffix", &lookup),
            "prefix_test_value_suffix"
        );
        assert_eq!(
            ContactsConfig::expand_vars("prefix_${NONEXISTENT_VAR}_suffix", &lookup),
            "prefix__suffix"
        );
        assert_eq!(ContactsConfig::expand_vars("${}_content", &lookup), "_content");
        assert_eq!(ContactsConfig::expand_vars("no_vars_here", &lookup), "no_vars_here");
    }

    #[test]
    fn test_toml_parsing() {
        let lookup = vars(&[("DATA_DIR", "/tmp/cx")]);
        let config = ContactsConfig::from_toml_str(
            r#"
            [store]
            backend = "memory"
            db_path = "${DATA_DIR}/contacts.db"
            access = "denied"

            [client]
            operation_timeout_secs = 0
            "#,
            &lookup,
        )
        .unwrap();

        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.db_path, "/tmp/cx/contacts.db");
        assert_eq!(config.access, AccessPolicy::Denied);
        assert_eq!(config.operation_timeout(), None);
    }

    #[test]
    fn test_toml_empty_uses_defaults() {
        let config = ContactsConfig::from_toml_str("", &vars(&[])).unwrap();
        assert_eq!(config, ContactsConfig::default());
    }

    #[test]
    fn test_toml_rejects_unknown_backend() {
        let result = ContactsConfig::from_toml_str("[store]\nbackend = \"ldap\"\n", &vars(&[]));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ContactsConfig::default();
        config
            .apply_overrides(&vars(&[
                ("CX_STORE", "unsupported"),
                ("CX_DB_PATH", "other.db"),
                ("CX_OPERATION_TIMEOUT", "5"),
                ("CX_ACCESS", "denied"),
            ]))
            .unwrap();

        assert_eq!(config.store, StoreKind::Unsupported);
        assert_eq!(config.db_path, "other.db");
        assert_eq!(config.operation_timeout_secs, 5);
        assert_eq!(config.access, AccessPolicy::Denied);
    }

    #[test]
    fn test_env_override_invalid_value() {
        let mut config = ContactsConfig::default();
        let result = config.apply_overrides(&vars(&[("CX_OPERATION_TIMEOUT", "soon")]));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_store_kind_from_str() {
        assert_eq!("SQLite".parse::<StoreKind>().unwrap(), StoreKind::Sqlite);
        assert_eq!("none".parse::<StoreKind>().unwrap(), StoreKind::Unsupported);
        assert!("ldap".parse::<StoreKind>().is_err());
    }

    #[tokio::test]
    async fn test_open_unsupported_store() {
        let config = ContactsConfig {
            store: StoreKind::Unsupported,
            ..Default::default()
        };
        let store = config.open_store().unwrap();
        assert_eq!(store.name(), "unsupported");
        assert_eq!(store.check_access().await, Err(ContactError::NotSupported));
    }
}
