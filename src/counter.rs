//! Click counter
//!
//! The demo component: a count that survives reloads, bumped by one button
//! and zeroed by another.

use crate::consts::{DEFAULT_COUNT, DEFAULT_KEY};
use crate::error::KeyError;
use crate::key::StorageKey;
use crate::persistent::{Builder, PersistentValue, SubscriptionId};
use crate::report::Reporter;
use crate::store::KeyValueStore;

/// Page heading
pub const TITLE: &str = "useLocaStorage";
/// Line under the heading
pub const SUBTITLE: &str = "Persist state between user sessions";
/// Reset button text
pub const RESET_LABEL: &str = "Reset to 0";

const COUNTER_KEY: StorageKey = StorageKey::from_static(DEFAULT_KEY);

/// Counter persisted under a storage key
#[derive(Debug)]
pub struct Counter<S> {
    count: PersistentValue<i64, S>,
}

impl<S: KeyValueStore> Counter<S> {
    /// Counter in the default `myCounter` slot
    pub fn open(store: S) -> Self {
        Self {
            count: PersistentValue::open(COUNTER_KEY, DEFAULT_COUNT, store),
        }
    }

    /// Counter in a custom slot
    pub fn with_key(key: &str, default: i64, store: S) -> Result<Self, KeyError> {
        let key = StorageKey::new(key)?;
        Ok(Self {
            count: PersistentValue::open(key, default, store),
        })
    }

    /// Counter with its own failure side channel
    pub fn with_reporter(
        key: &str,
        default: i64,
        store: S,
        reporter: impl Reporter + 'static,
    ) -> Result<Self, KeyError> {
        let key = StorageKey::new(key)?;
        Ok(Self {
            count: Builder::new(key, default)
                .reporter(reporter)
                .open(store),
        })
    }

    pub fn count(&self) -> i64 {
        *self.count.get()
    }

    /// Add one, relative to the latest count
    pub fn increment(&mut self) {
        self.count.update(|c| c.saturating_add(1));
    }

    /// Add `presses` in one update, written once
    pub fn increment_by(&mut self, presses: u32) {
        self.count.update(|c| c.saturating_add(i64::from(presses)));
    }

    pub fn reset(&mut self) {
        self.count.set(0);
    }

    /// Jump straight to `value`
    pub fn set(&mut self, value: i64) {
        self.count.set(value);
    }

    /// Count button text
    pub fn label(&self) -> String {
        label(self.count())
    }

    /// Whether clicks are being saved
    pub fn is_persistent(&self) -> bool {
        self.count.is_persistent()
    }

    /// Re-render hook: called with the new count after every change
    pub fn subscribe(&mut self, mut listener: impl FnMut(i64) + 'static) -> SubscriptionId {
        self.count.subscribe(move |c| listener(*c))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.count.unsubscribe(id)
    }
}

/// Count button text for `count`
pub fn label(count: i64) -> String {
    format!("count is {}", count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, UnavailableStore};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_fresh_counter_starts_at_zero() {
        let store = MemoryStore::new();
        let counter = Counter::open(store.clone());
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.label(), "count is 0");
        assert_eq!(store.raw(DEFAULT_KEY).as_deref(), Some("0"));
    }

    #[test]
    fn test_count_survives_reload() {
        let store = MemoryStore::new();
        let mut counter = Counter::open(store.clone());
        counter.increment();
        counter.increment();
        drop(counter);

        let reloaded = Counter::open(store);
        assert_eq!(reloaded.count(), 2);
        assert_eq!(reloaded.label(), "count is 2");
    }

    #[test]
    fn test_increment_then_reset() {
        let store = MemoryStore::new();
        let mut counter = Counter::with_key("counter", 0, store.clone()).unwrap();
        counter.increment();
        counter.increment();
        counter.increment();
        assert_eq!(counter.count(), 3);
        assert_eq!(store.raw("counter").as_deref(), Some("3"));

        counter.reset();
        assert_eq!(counter.count(), 0);
        assert_eq!(store.raw("counter").as_deref(), Some("0"));
    }

    #[test]
    fn test_increment_saturates() {
        let store = MemoryStore::new();
        store.insert_raw("counter", i64::MAX.to_string());
        let mut counter = Counter::with_key("counter", 0, store).unwrap();
        counter.increment();
        assert_eq!(counter.count(), i64::MAX);
    }

    #[test]
    fn test_increment_by_is_one_update() {
        let mut counter = Counter::open(MemoryStore::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        counter.subscribe(move |c| sink.borrow_mut().push(c));

        counter.increment_by(3);
        assert_eq!(counter.count(), 3);
        assert_eq!(*seen.borrow(), vec![3]);
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = Counter::with_key("", 0, MemoryStore::new());
        assert!(matches!(result, Err(KeyError::Empty)));
    }

    #[test]
    fn test_subscribe_sees_each_click() {
        let mut counter = Counter::open(MemoryStore::new());
        let labels = Rc::new(RefCell::new(Vec::new()));
        let sink = labels.clone();
        counter.subscribe(move |c| sink.borrow_mut().push(label(c)));

        counter.increment();
        counter.increment();
        counter.reset();
        assert_eq!(*labels.borrow(), vec!["count is 1", "count is 2", "count is 0"]);
    }

    #[test]
    fn test_counter_without_storage_still_counts() {
        let reports = Rc::new(RefCell::new(0));
        let sink = reports.clone();
        let mut counter = Counter::with_reporter(
            DEFAULT_KEY,
            DEFAULT_COUNT,
            UnavailableStore::default(),
            move |_: &crate::error::PersistError| *sink.borrow_mut() += 1,
        )
        .unwrap();

        counter.increment();
        counter.set(41);
        counter.increment();
        assert_eq!(counter.count(), 42);
        assert!(!counter.is_persistent());
        assert_eq!(*reports.borrow(), 1);
    }
}
