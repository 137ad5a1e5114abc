//! Thread-safe access to a catalog store.
//!
//! A [`SharedCatalogStore`] is a cloneable handle around a single
//! `RwLock<CatalogStore>`, so lookups from many threads proceed in parallel
//! while registration and locale changes take the lock exclusively.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::store::{CatalogStore, LoadError, LookupError};
use crate::types::Value;

/// Cloneable, lock-protected handle to a [`CatalogStore`].
#[derive(Debug, Clone)]
pub struct SharedCatalogStore {
    inner: Arc<RwLock<CatalogStore>>,
}

impl SharedCatalogStore {
    pub fn new(store: CatalogStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Provides read access to the store.
    pub fn read<T>(&self, f: impl FnOnce(&CatalogStore) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Provides write access to the store.
    pub fn write<T>(&self, f: impl FnOnce(&mut CatalogStore) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// See [`CatalogStore::get`].
    pub fn get(&self, path: &str, args: &HashMap<String, Value>) -> Result<String, LookupError> {
        self.read(|store| store.get(path, args))
    }

    /// See [`CatalogStore::add_locale`].
    pub fn add_locale(&self, locale: impl Into<String>) -> Result<usize, LoadError> {
        self.write(|store| store.add_locale(locale))
    }

    pub fn set_fallback(&self, locale: impl Into<String>) {
        self.write(|store| store.set_fallback(locale));
    }

    pub fn set_current_locale(&self, locale: impl Into<String>) {
        self.write(|store| store.set_current_locale(locale));
    }

    /// Returns the current locale of the store.
    pub fn current_locale(&self) -> String {
        self.read(|store| store.current_locale().to_owned())
    }
}

impl From<CatalogStore> for SharedCatalogStore {
    fn from(store: CatalogStore) -> Self {
        Self::new(store)
    }
}
