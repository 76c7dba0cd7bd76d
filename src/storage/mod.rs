mod json_file;
mod memory;
mod sqlite;

pub use self::json_file::JsonFileStorage;
pub use self::memory::MemoryStorage;
pub use self::sqlite::SqliteStorage;

/// A string-keyed, string-valued local storage, in the manner of a browser's `localStorage`.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()>;

    fn describe(&self) -> String;
}

impl KeyValueStorage for Box<dyn KeyValueStorage> {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set_item(key, value)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
