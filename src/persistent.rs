//! Write-through persistent value
//!
//! A value cell whose initial value is recovered from a [`KeyValueStore`] and
//! whose every change is written back before the update returns.
//!
//! Persistence is best effort. Decode failures, rejected writes and a missing
//! store are reported to a [`Reporter`] and never stop the value from
//! working in memory.

use std::fmt;

use crate::codec::{Codec, JsonCodec};
use crate::error::{PersistError, WriteFailure};
use crate::key::StorageKey;
use crate::report::{LogReporter, Reporter};
use crate::store::KeyValueStore;

/// Handle returned by [`PersistentValue::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// A value mirrored into one slot of a key/value store
pub struct PersistentValue<T, S, C = JsonCodec> {
    key: StorageKey,
    value: T,
    /// `None` once the store proved unreachable; the value is memory-only from then on
    store: Option<S>,
    codec: C,
    reporter: Box<dyn Reporter>,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_subscription: u64,
}

/// Configures codec and reporter before the slot is read
pub struct Builder<T, C = JsonCodec> {
    key: StorageKey,
    default: T,
    codec: C,
    reporter: Box<dyn Reporter>,
}

impl<T> Builder<T, JsonCodec> {
    /// Start configuring a value stored under `key`
    pub fn new(key: StorageKey, default: T) -> Self {
        Self {
            key,
            default,
            codec: JsonCodec,
            reporter: Box::new(LogReporter),
        }
    }
}

impl<T, C> Builder<T, C> {
    /// Use a different text encoding
    pub fn codec<C2: Codec<T>>(self, codec: C2) -> Builder<T, C2> {
        Builder {
            key: self.key,
            default: self.default,
            codec,
            reporter: self.reporter,
        }
    }

    /// Send recoverable failures somewhere other than the log
    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }
}

impl<T, C: Codec<T>> Builder<T, C> {
    /// Read the slot from `store` and build the value
    pub fn open<S: KeyValueStore>(self, store: S) -> PersistentValue<T, S, C> {
        PersistentValue::load(self.key, self.default, store, self.codec, self.reporter)
    }
}

impl<T, S> PersistentValue<T, S, JsonCodec>
where
    S: KeyValueStore,
    JsonCodec: Codec<T>,
{
    /// JSON-encoded value that reports failures to the log
    pub fn open(key: StorageKey, default: T, store: S) -> Self {
        Builder::new(key, default).open(store)
    }
}

impl<T, S: KeyValueStore, C: Codec<T>> PersistentValue<T, S, C> {
    fn load(key: StorageKey, default: T, store: S, codec: C, reporter: Box<dyn Reporter>) -> Self {
        let mut this = Self {
            key,
            value: default,
            store: None,
            codec,
            reporter,
            listeners: Vec::new(),
            next_subscription: 0,
        };

        let stored = store.get(this.key.as_str());
        match stored {
            Ok(Some(text)) => {
                this.store = Some(store);
                match this.codec.decode(&text) {
                    Ok(value) => {
                        log::info!("Loaded `{}` from storage", this.key);
                        this.value = value;
                    }
                    Err(source) => {
                        this.reporter.report(&PersistError::DecodeFailure {
                            key: this.key.to_string(),
                            source,
                        });
                        this.write_through();
                    }
                }
            }
            Ok(None) => {
                log::info!("No stored `{}`, using default", this.key);
                this.store = Some(store);
                this.write_through();
            }
            Err(source) => {
                this.reporter.report(&PersistError::StoreUnavailable {
                    key: this.key.to_string(),
                    source,
                });
            }
        }

        this
    }

    /// Current value
    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    /// Whether updates are still being written to a store
    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    /// Replace the value, write it through and notify subscribers
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.write_through();
        self.notify();
    }

    /// Replace the value with `f(current)`
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.value);
        self.set(next);
    }

    /// Call `listener` with the new value after every update
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Drop the wrapper and keep the value. The stored slot is left in place.
    pub fn into_inner(self) -> T {
        self.value
    }

    fn write_through(&self) {
        let Some(store) = &self.store else {
            return;
        };

        let result = self
            .codec
            .encode(&self.value)
            .map_err(WriteFailure::from)
            .and_then(|text| store.set(self.key.as_str(), &text).map_err(WriteFailure::from));

        match result {
            Ok(()) => log::debug!("Saved `{}`", self.key),
            Err(reason) => self.reporter.report(&PersistError::StoreWriteFailure {
                key: self.key.to_string(),
                reason,
            }),
        }
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.value);
        }
    }
}

impl<T: fmt::Debug, S, C> fmt::Debug for PersistentValue<T, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentValue")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("persistent", &self.store.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
