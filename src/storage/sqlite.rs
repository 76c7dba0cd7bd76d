use std::path::{Path, PathBuf};

use anyhow::Context;

use super::KeyValueStorage;

pub struct SqliteStorage {
    pub conn: rusqlite::Connection,
    path: PathBuf,
}

impl SqliteStorage {
    pub fn open(file_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = file_path.as_ref().to_path_buf();
        let conn = rusqlite::Connection::open_with_flags(
            &path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE | rusqlite::OpenFlags::SQLITE_OPEN_CREATE,
        )
        .with_context(|| format!("Failed to open SQLite DB: {}", path.display()))?;
        Self::init(conn, path)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()
            .context("Failed to open in-memory SQLite DB")?;
        Self::init(conn, PathBuf::from(":memory:"))
    }

    fn init(conn: rusqlite::Connection, path: PathBuf) -> anyhow::Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL)",
            (),
        )
        .with_context(|| format!("Creating kv table in {}", path.display()))?;
        Ok(Self { conn, path })
    }

    fn optional_single_row_result<T>(result: anyhow::Result<T>) -> anyhow::Result<Option<T>> {
        match result {
            Ok(row) => Ok(Some(row)),
            Err(err) => match err.downcast::<rusqlite::Error>() {
                Ok(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Ok(rusqlite_err) => Err(rusqlite_err.into()),
                Err(err) => Err(err),
            },
        }
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let result = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ? LIMIT 1", (key,), |row| {
                row.get::<_, String>(0)
            })
            .map_err(anyhow::Error::from);

        Self::optional_single_row_result(result).with_context(|| format!("Reading key {key:?}"))
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (:key, :value) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::named_params! {
                    ":key": key,
                    ":value": value,
                },
            )
            .with_context(|| format!("Writing key {key:?} to {}", self.path.display()))?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("SQLite storage {}", self.path.display())
    }
}
