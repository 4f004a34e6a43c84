//! Persistent key-value store.
//!
//! The store maps string keys to JSON-encoded string values and is persisted as
//! a single JSON object on disk. Every write rewrites the whole file using a
//! temp file and rename, so a reader never sees a half-written store.
//!
//! Keys:
//! - `employees`: array of employee records
//! - `admin`: array of admin accounts
//! - `users`: array of plain user accounts
//! - `user`: last-known session identity
//! - `loggedInEmployeeId`: id of the logged-in account

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::seed;

pub const EMPLOYEES_KEY: &str = "employees";
pub const ADMIN_KEY: &str = "admin";
pub const USERS_KEY: &str = "users";
pub const USER_KEY: &str = "user";
pub const LOGGED_IN_ID_KEY: &str = "loggedInEmployeeId";

/// String key to JSON string value store, optionally backed by a file.
#[derive(Debug, Default)]
pub struct Store {
    path: Option<PathBuf>,
    items: BTreeMap<String, String>,
}

impl Store {
    /// Open the store file at `path`, seeding any missing records.
    ///
    /// A missing file starts empty and a corrupt one is logged and replaced by a
    /// freshly seeded store. Read failures are returned as `Error::Io` and
    /// leave the file untouched.
    pub fn open(path: &Path) -> Result<Self> {
        let items = if path.exists() {
            let buf = fs::read_to_string(path)?;
            match serde_json::from_str(&buf) {
                Ok(items) => items,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "store file is corrupt, starting fresh");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        let mut store = Store { path: Some(path.to_path_buf()), items };
        debug!(path = %path.display(), keys = store.items.len(), "opened store");
        store.seed_if_missing()?;
        Ok(store)
    }

    /// An empty store that lives only in memory.
    pub fn in_memory() -> Self {
        Store::default()
    }

    /// An in-memory store holding the seed fixture.
    pub fn seeded() -> Result<Self> {
        let mut store = Store::in_memory();
        store.seed_if_missing()?;
        Ok(store)
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.items.insert(key.to_string(), value.into());
        self.persist()
    }

    pub fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.items.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    /// Decode the JSON value under `key`. `Ok(None)` when the key is absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_item(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    /// Encode `value` as JSON and store it under `key`.
    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, raw)
    }

    /// Write the seed fixture for every record key that is not present yet.
    /// Returns true when anything was written.
    pub fn seed_if_missing(&mut self) -> Result<bool> {
        let mut seeded = false;
        if !self.items.contains_key(EMPLOYEES_KEY) {
            self.items.insert(EMPLOYEES_KEY.into(), serde_json::to_string(&seed::employees()?)?);
            seeded = true;
        }
        if !self.items.contains_key(ADMIN_KEY) {
            self.items.insert(ADMIN_KEY.into(), serde_json::to_string(&seed::admins())?);
            seeded = true;
        }
        if !self.items.contains_key(USERS_KEY) {
            self.items.insert(USERS_KEY.into(), serde_json::to_string(&seed::users())?);
            seeded = true;
        }
        if seeded {
            info!("seeded store with fixture records");
            self.persist()?;
        }
        Ok(seeded)
    }

    /// Drop every key, including the session, and seed again.
    pub fn reset(&mut self) -> Result<()> {
        self.items.clear();
        self.seed_if_missing()?;
        Ok(())
    }

    /// Save the store using atomic write (temp file + rename).
    fn persist(&self) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(&self.items)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        debug!(path = %path.display(), "store written");
        Ok(())
    }
}
