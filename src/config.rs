use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::storage::{JsonFileStorage, KeyValueStorage, MemoryStorage, SqliteStorage};
use crate::store::IdPolicy;

pub const CONFIG_FILE_ENV: &str = "USERFORM_CONFIG_FILE";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageFilePath(pub PathBuf);

impl Default for StorageFilePath {
    fn default() -> Self {
        Self(PathBuf::from("userform.storage.sqlite"))
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageConfig {
    Sqlite {
        #[serde(default)]
        path: StorageFilePath,
    },
    Json {
        path: PathBuf,
    },
    Memory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Sqlite {
            path: StorageFilePath::default(),
        }
    }
}

impl StorageConfig {
    pub fn open(&self) -> anyhow::Result<Box<dyn KeyValueStorage>> {
        let storage: Box<dyn KeyValueStorage> = match self {
            StorageConfig::Sqlite { path } => Box::new(SqliteStorage::open(&path.0)?),
            StorageConfig::Json { path } => Box::new(JsonFileStorage::open(path)?),
            StorageConfig::Memory => Box::new(MemoryStorage::new()),
        };
        Ok(storage)
    }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub id_policy: IdPolicy,
}

impl AppConfig {
    pub fn try_read(file_path: &Path) -> anyhow::Result<AppConfig> {
        let json = &std::fs::read_to_string(file_path)
            .with_context(|| format!("Reading config file {file_path:?}"))?;
        serde_json::from_str::<AppConfig>(json)
            .with_context(|| format!("Parsing JSON config file {file_path:?}"))
    }

    /// Use the explicit path if given, then the environment variable, then the defaults.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
        if let Some(path) = explicit {
            return Self::try_read(path);
        }
        match std::env::var_os(CONFIG_FILE_ENV) {
            Some(path) => Self::try_read(Path::new(&path)),
            None => {
                log::debug!("{CONFIG_FILE_ENV} not set, using default configuration");
                Ok(AppConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(
            config.storage,
            StorageConfig::Sqlite {
                path: StorageFilePath(PathBuf::from("userform.storage.sqlite"))
            }
        );
        assert_eq!(config.id_policy, IdPolicy::MaxPlusOne);
    }

    #[test]
    fn test_parse_json_storage_and_legacy_ids() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "storage": { "kind": "json", "path": "users.json" }, "id_policy": "last-plus-one" }"#,
        )
        .unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Json {
                path: PathBuf::from("users.json")
            }
        );
        assert_eq!(config.id_policy, IdPolicy::LastPlusOne);
    }

    #[test]
    fn test_try_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userform.config.json");
        std::fs::write(&path, r#"{ "storage": { "kind": "memory" } }"#).unwrap();
        let config = AppConfig::try_read(&path).unwrap();
        assert_eq!(config.storage, StorageConfig::Memory);

        std::fs::write(&path, "{ nope").unwrap();
        let err = AppConfig::try_read(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Parsing JSON config file"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        std::fs::write(&path, r#"{ "id_policy": "last-plus-one" }"#).unwrap();
        let config = AppConfig::resolve(Some(&path)).unwrap();
        assert_eq!(config.id_policy, IdPolicy::LastPlusOne);
    }

    #[test]
    fn test_open_sqlite_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageConfig::Sqlite {
            path: StorageFilePath(dir.path().join("s.sqlite")),
        }
        .open()
        .unwrap();
        assert_eq!(storage.get_item("users").unwrap(), None);
    }
}
