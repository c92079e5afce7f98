use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const TABLENAME: &str = "kvstore";
const KEY_FIELD: &str = "key";
const VALUE_FIELD: &str = "value";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum KVStoreError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("could not (de)serialize value: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

/// Key-value store backed by a single SQLite table. Values are kept as JSON text.
pub struct KVDb(Connection);

impl KVDb {
    /// Opens (and if needed creates) the database at `path`. `":memory:"` gives a
    /// private in-memory store.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        // Create directory for DB if it doesn't already exist
        std::fs::create_dir_all(path.as_ref().parent().unwrap_or(Path::new("")))?;
        let connection = Connection::open(path)?;
        connection.busy_timeout(BUSY_TIMEOUT)?;
        connection.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS '{TABLENAME}' (
                {KEY_FIELD} TEXT PRIMARY KEY NOT NULL,
                {VALUE_FIELD} TEXT NOT NULL
                )"
            ),
            [],
        )?;
        Ok(KVDb(connection))
    }

    pub fn get_raw(&self, key: impl AsRef<str>) -> Result<Option<String>, KVStoreError> {
        self.0
            .query_row(
                &format!("SELECT {VALUE_FIELD} FROM '{TABLENAME}' WHERE {KEY_FIELD} = ?1"),
                [key.as_ref()],
                |r| r.get::<_, String>(0),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn get<T: DeserializeOwned>(&self, key: impl AsRef<str>) -> Result<Option<T>, KVStoreError> {
        self.get_raw(key)?
            .map(|v| serde_json::from_str::<T>(&v))
            .transpose()
            .map_err(Into::into)
    }

    pub fn set_raw(&self, key: impl AsRef<str>, value_json: &str) -> Result<(), KVStoreError> {
        upsert(&self.0, key.as_ref(), value_json)?;
        log::trace!("Set {}", key.as_ref());
        Ok(())
    }

    pub fn set<V: Serialize + ?Sized>(
        &self,
        key: impl AsRef<str>,
        value: &V,
    ) -> Result<(), KVStoreError> {
        self.set_raw(key, &serde_json::to_string(value)?)
    }

    /// Writes all pairs in one transaction; either every key is updated or none is.
    pub fn set_many<K: AsRef<str>>(&self, pairs: &[(K, Value)]) -> Result<(), KVStoreError> {
        let tx = self.0.unchecked_transaction()?;
        for (key, value) in pairs {
            upsert(&tx, key.as_ref(), &serde_json::to_string(value)?)?;
        }
        tx.commit()?;
        log::trace!("Set {} keys", pairs.len());
        Ok(())
    }
}

fn upsert(conn: &Connection, key: &str, value_json: &str) -> Result<usize, rusqlite::Error> {
    let mut stmt = conn.prepare_cached(&format!(
        "INSERT INTO '{TABLENAME}' ({KEY_FIELD}, {VALUE_FIELD}) values (?1, ?2)
        ON CONFLICT({KEY_FIELD}) DO UPDATE SET {VALUE_FIELD}=?2",
    ))?;
    stmt.execute(params![key, value_json])
}
