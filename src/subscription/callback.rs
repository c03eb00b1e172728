// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback storage and isolated invocation.
//!
//! - [`DeviceCallback`] / [`EventCallback`] - the two callback shapes
//! - [`CallbackTable`] - keyed, ordered callback lists
//! - [`invoke_isolated`] - runs one callback and contains its panic

use std::fmt;
use std::hash::Hash;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use crate::device::Device;

/// Callback receiving the live device object that changed.
pub type DeviceCallback = Arc<dyn Fn(&Device) + Send + Sync>;

/// Callback receiving a raw event payload (timeline record, automation
/// payload).
pub type EventCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// Table of callbacks grouped by key.
///
/// Callbacks registered under one key are kept in registration order. The
/// same callback may be registered several times under one key; each
/// registration is invoked separately.
///
/// Dispatch never holds a table lock while user code runs: callers take a
/// snapshot with [`callbacks`](Self::callbacks) and invoke from that, so a
/// callback may subscribe or unsubscribe without deadlocking.
pub struct CallbackTable<K, C>
where
    K: Eq + Hash,
{
    entries: DashMap<K, Vec<C>>,
}

impl<K, C> CallbackTable<K, C>
where
    K: Eq + Hash,
    C: Clone,
{
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Appends a callback under `key`.
    pub fn register(&self, key: K, callback: C) {
        self.entries.entry(key).or_default().push(callback);
    }

    /// Removes every callback under `key`.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_all<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries
            .remove(key)
            .is_some_and(|(_, callbacks)| !callbacks.is_empty())
    }

    /// Returns a snapshot of the callbacks under `key`, in registration order.
    #[must_use]
    pub fn callbacks<Q>(&self, key: &Q) -> Vec<C>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Returns the number of callbacks under `key`.
    #[must_use]
    pub fn callback_count<Q>(&self, key: &Q) -> usize
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(key).map_or(0, |entry| entry.value().len())
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.value().len()).sum()
    }

    /// Removes every callback.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl<K, C> Default for CallbackTable<K, C>
where
    K: Eq + Hash,
    C: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> fmt::Debug for CallbackTable<K, C>
where
    K: Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|entry| (format!("{:?}", entry.key()), entry.value().len())),
            )
            .finish()
    }
}

/// Runs `invoke`, logging and swallowing a panic instead of propagating it.
///
/// Returns `false` if the callback panicked. `target` names what was being
/// dispatched (device id, event code, group) for the log record.
pub fn invoke_isolated<F>(target: &str, invoke: F) -> bool
where
    F: FnOnce(),
{
    match catch_unwind(AssertUnwindSafe(invoke)) {
        Ok(()) => true,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            tracing::error!(target_key = %target, panic = %message, "Event callback panicked");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Counter = Arc<dyn Fn() + Send + Sync>;

    #[test]
    fn callbacks_keep_registration_order() {
        let table: CallbackTable<String, u8> = CallbackTable::new();
        table.register("a".to_string(), 1);
        table.register("a".to_string(), 2);
        table.register("b".to_string(), 3);

        assert_eq!(table.callbacks("a"), vec![1, 2]);
        assert_eq!(table.callbacks("b"), vec![3]);
        assert!(table.callbacks("c").is_empty());
        assert_eq!(table.total_count(), 3);
    }

    #[test]
    fn remove_all_drops_every_registration_for_key() {
        let table: CallbackTable<String, u8> = CallbackTable::new();
        table.register("a".to_string(), 1);
        table.register("a".to_string(), 1);

        assert!(table.remove_all("a"));
        assert_eq!(table.callback_count("a"), 0);
        assert!(!table.remove_all("a"));
    }

    #[test]
    fn clear_empties_table() {
        let table: CallbackTable<String, u8> = CallbackTable::default();
        table.register("a".to_string(), 1);
        table.clear();
        assert_eq!(table.total_count(), 0);
    }

    #[test]
    fn snapshot_is_detached_from_table() {
        let table: CallbackTable<String, Counter> = CallbackTable::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        table.register("a".to_string(), Arc::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }));

        for callback in table.callbacks("a") {
            // Mutating the table mid-dispatch must not deadlock.
            table.remove_all("a");
            callback();
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panics_are_contained() {
        assert!(invoke_isolated("ok", || {}));
        assert!(!invoke_isolated("boom", || panic!("boom")));
        assert!(!invoke_isolated("boom", || panic!("{}", String::from("formatted"))));
    }
}
