use rusqlite::{Connection, OptionalExtension, Result, params};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_CONFIG_DIR: &str = "~/.config/annomap/";
pub const DATABASE_FILE: &str = "annomap.db";

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const REFERENCE_ID_KEY: &str = "referenceId";

/// Key-value settings persisted between runs.
pub struct SettingsStore {
    conn: Connection,
}

/// Snapshot of the settings a report needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub auth_token: Option<String>,
    pub reference_id: Option<String>,
}

/// `<dir>/annomap.db`, with `~` expanded.
pub fn database_path(config_dir: &str) -> PathBuf {
    let expanded = shellexpand::tilde(config_dir);
    Path::new(expanded.as_ref()).join(DATABASE_FILE)
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

impl SettingsStore {
    pub fn drop(path: &Path) -> std::io::Result<()> {
        fs::remove_file(path)
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = SettingsStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let store = SettingsStore {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            ",
        )
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, current_timestamp()],
        )?;
        Ok(())
    }

    /// Returns true when a value was removed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    pub fn auth_token(&self) -> Result<Option<String>> {
        self.get(AUTH_TOKEN_KEY)
    }

    pub fn set_auth_token(&self, token: &str) -> Result<()> {
        self.set(AUTH_TOKEN_KEY, token)
    }

    pub fn reference_id(&self) -> Result<Option<String>> {
        self.get(REFERENCE_ID_KEY)
    }

    pub fn set_reference_id(&self, reference_id: &str) -> Result<()> {
        self.set(REFERENCE_ID_KEY, reference_id)
    }

    pub fn load(&self) -> Result<Settings> {
        Ok(Settings {
            auth_token: self.auth_token()?,
            reference_id: self.reference_id()?,
        })
    }
}
