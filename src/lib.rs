//! Local Counter - a click counter that remembers its count between sessions
//!
//! Core modules:
//! - `persistent`: Write-through value cell over a key/value store
//! - `store`: Store backends (memory, JSON file, LocalStorage)
//! - `codec`: Text encodings for stored values
//! - `counter`: The counter component built on a persistent value
//! - `report`: Side channel for recoverable persistence failures

pub mod codec;
pub mod counter;
pub mod error;
pub mod key;
pub mod persistent;
pub mod report;
pub mod store;

pub use codec::{Codec, FnCodec, JsonCodec};
pub use counter::Counter;
pub use error::{CodecError, KeyError, PersistError, StoreError, WriteFailure};
pub use key::StorageKey;
pub use persistent::{Builder, PersistentValue, SubscriptionId};
pub use report::{LogReporter, Reporter};
pub use store::{KeyValueStore, MemoryStore, UnavailableStore};

#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;

#[cfg(target_arch = "wasm32")]
pub use store::LocalStorage;

/// App configuration constants
pub mod consts {
    /// Storage slot for the counter
    pub const DEFAULT_KEY: &str = "myCounter";
    /// Count on first use
    pub const DEFAULT_COUNT: i64 = 0;

    /// Directory under the platform data dir (native)
    pub const APP_DIR_NAME: &str = "local-counter";
    /// Store file inside `APP_DIR_NAME` (native)
    pub const STORE_FILE_NAME: &str = "store.json";
}
