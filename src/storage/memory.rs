use std::collections::HashMap;

use super::KeyValueStorage;

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory storage".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_and_overwrite() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("users").unwrap(), None);

        storage.set_item("users", "[]").unwrap();
        storage.set_item("users", "[1]").unwrap();
        assert_eq!(storage.get_item("users").unwrap().as_deref(), Some("[1]"));
    }
}
