//! Durable key/value backends
//!
//! Handles the media a [`PersistentValue`](crate::PersistentValue) can write
//! through to:
//! - Memory (tests, shared fixtures)
//! - JSON file (native)
//! - LocalStorage (web)

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod web;

pub use memory::{MemoryStore, UnavailableStore};

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

use std::rc::Rc;

use crate::error::StoreError;

/// String-keyed text store.
///
/// Calls are synchronous and take `&self`; backends that mutate in memory use
/// interior mutability. Nothing here is `Send`, matching the single UI thread
/// the browser store lives on.
pub trait KeyValueStore {
    /// Text stored under `key`, or `None` if the slot is empty
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace whatever is stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}
