//! Persistence port for the order session.
//!
//! State is laid out as three independent JSON entries, mirroring browser
//! local storage:
//!
//! | Key | Content |
//! |-----|---------|
//! | `cartItems` | array of [`CartLine`] |
//! | `cartRate` | tier id (`"icms12"`); absent when no tier is active |
//! | `clientData` | [`CustomerMetadata`] object |
//!
//! A missing entry means "empty/default", never an error. A corrupt entry is
//! logged and treated as missing; the other entries still load.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::PedidoError;
use super::regions::TaxTier;
use super::types::{CartLine, CustomerMetadata};

pub const CART_ITEMS_KEY: &str = "cartItems";
pub const CART_RATE_KEY: &str = "cartRate";
pub const CLIENT_DATA_KEY: &str = "clientData";

/// Everything the session persists between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub lines: Vec<CartLine>,
    pub active_tier: Option<TaxTier>,
    pub customer: CustomerMetadata,
}

impl PersistedState {
    /// Encode into `(key, json)` entries. The rate entry is `None` when no
    /// tier is active, meaning "remove the key".
    pub fn to_entries(&self) -> Result<Vec<(&'static str, Option<String>)>, PedidoError> {
        Ok(vec![
            (CART_ITEMS_KEY, Some(serde_json::to_string(&self.lines)?)),
            (
                CART_RATE_KEY,
                self.active_tier.map(|t| serde_json::to_string(&t)).transpose()?,
            ),
            (CLIENT_DATA_KEY, Some(serde_json::to_string(&self.customer)?)),
        ])
    }

    /// Decode from entries looked up by `get`.
    ///
    /// Absent keys default. Each entry is decoded on its own: a corrupt entry
    /// is logged and falls back to its default without discarding the others.
    /// Only failures of `get` itself are returned.
    pub fn from_entries<F>(mut get: F) -> Result<Self, PedidoError>
    where
        F: FnMut(&str) -> Result<Option<String>, PedidoError>,
    {
        Ok(Self {
            lines: decode_entry(CART_ITEMS_KEY, get(CART_ITEMS_KEY)?).unwrap_or_default(),
            active_tier: decode_entry(CART_RATE_KEY, get(CART_RATE_KEY)?),
            customer: decode_entry(CLIENT_DATA_KEY, get(CLIENT_DATA_KEY)?).unwrap_or_default(),
        })
    }
}

fn decode_entry<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "discarding unreadable stored entry");
            None
        }
    }
}

/// Durable storage for an order session.
pub trait OrderStorage {
    /// Load the last saved state. Absent entries yield defaults.
    fn load(&self) -> Result<PersistedState, PedidoError>;

    /// Persist all three entries together.
    fn save(&mut self, state: &PersistedState) -> Result<(), PedidoError>;
}

impl<S: OrderStorage + ?Sized> OrderStorage for &mut S {
    fn load(&self) -> Result<PersistedState, PedidoError> {
        (**self).load()
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), PedidoError> {
        (**self).save(state)
    }
}

/// In-memory key-value store holding the raw JSON entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw entry, as a browser would expose it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Overwrite a raw entry. Useful to seed corrupt or legacy data.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OrderStorage for MemoryStorage {
    fn load(&self) -> Result<PersistedState, PedidoError> {
        PersistedState::from_entries(|key| Ok(self.entries.get(key).cloned()))
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), PedidoError> {
        for (key, value) in state.to_entries()? {
            match value {
                Some(json) => self.set(key, json),
                None => self.remove(key),
            }
        }
        Ok(())
    }
}
