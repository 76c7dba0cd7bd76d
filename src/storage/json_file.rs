use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, info};

use super::KeyValueStorage;

/// Keys and values kept as one JSON object in a single file. The whole file is
/// rewritten on every write.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl JsonFileStorage {
    /// Read the storage file from the specified path if it exists, otherwise start empty.
    pub fn open(file_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = file_path.as_ref().to_path_buf();
        let items = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                info!("Loading storage file {}", path.display());
                serde_json::from_str::<BTreeMap<String, String>>(&contents)
                    .with_context(|| format!("Parsing JSON storage file {}", path.display()))?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Storage file {} does not exist, starting empty",
                    path.display()
                );
                BTreeMap::new()
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Reading storage file {}", path.display()))
            }
        };
        Ok(Self { path, items })
    }

    fn write(&self) -> anyhow::Result<()> {
        let contents = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Writing storage file {}", self.path.display()))?;
        debug!("Wrote {} key(s) to {}", self.items.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let previous = self.items.insert(key.to_owned(), value.to_owned());
        if let Err(err) = self.write() {
            match previous {
                Some(previous) => self.items.insert(key.to_owned(), previous),
                None => self.items.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("JSON storage file {}", self.path.display())
    }
}
