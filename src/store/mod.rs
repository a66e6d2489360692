//! Directory-backed storage for order sessions.
//!
//! Each persisted entry lives in its own `<key>.json` file inside one
//! directory (`cartItems.json`, `cartRate.json`, `clientData.json`), so the
//! layout matches the key-value entries of [`crate::core::PersistedState`].
//!
//! ```no_run
//! use pedido::core::*;
//! use pedido::store::FileStorage;
//!
//! let storage = FileStorage::new("/var/lib/pedido/session");
//! let session = OrderSession::open(storage, PricingConfig::default());
//! println!("{} lines restored", session.lines().len());
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{OrderStorage, PedidoError, PersistedState};

/// Stores each entry as a JSON file in `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read_entry(&self, key: &str) -> Result<Option<String>, PedidoError> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PedidoError::Storage(format!("cannot read entry '{key}': {e}"))),
        }
    }

    fn write_entry(&self, key: &str, value: Option<&str>) -> Result<(), PedidoError> {
        let path = self.entry_path(key);
        match value {
            Some(json) => {
                // Entries are replaced whole, never partially written.
                let tmp = path.with_extension("json.tmp");
                let replaced = fs::write(&tmp, json).and_then(|()| fs::rename(&tmp, &path));
                if let Err(e) = replaced {
                    let _ = fs::remove_file(&tmp);
                    return Err(PedidoError::Storage(format!("cannot write entry '{key}': {e}")));
                }
            }
            None => match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }
        Ok(())
    }
}

impl OrderStorage for FileStorage {
    fn load(&self) -> Result<PersistedState, PedidoError> {
        PersistedState::from_entries(|key| self.read_entry(key))
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), PedidoError> {
        fs::create_dir_all(&self.dir)?;
        for (key, value) in state.to_entries()? {
            self.write_entry(key, value.as_deref())?;
        }
        debug!(dir = %self.dir.display(), lines = state.lines.len(), "order state saved");
        Ok(())
    }
}
