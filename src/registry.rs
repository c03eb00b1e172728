// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of live device state objects.

use std::collections::HashSet;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;

use crate::device::{Attributes, Device, DeviceId, alarm_device_id, panel_attributes};

/// Registry of every device the library has observed, keyed by identifier.
///
/// Holds exactly one [`Device`] per identifier. Snapshots merge into the
/// existing object when there is one, so handles given out earlier keep
/// observing live state. Storage is a `DashMap`: lookups and merges on
/// different devices do not contend, and each device's attributes have
/// their own lock.
///
/// # Examples
///
/// ```
/// use abode_lib::registry::DeviceRegistry;
/// use serde_json::json;
///
/// let registry = DeviceRegistry::new();
/// let snapshot = json!([
///     {"id": "RF:1", "type_tag": "device_type.door_contact", "status": "Closed"},
///     {"id": "ZB:2", "type_tag": "device_type.povs", "status": "Online"}
/// ]);
/// let raw = snapshot
///     .as_array()
///     .unwrap()
///     .iter()
///     .filter_map(|d| d.as_object().cloned())
///     .collect::<Vec<_>>();
///
/// let affected = registry.upsert_snapshot(raw);
/// assert_eq!(affected.len(), 2);
/// assert!(registry.get("RF:1").is_some());
/// ```
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: DashMap<DeviceId, Device>,
}

impl DeviceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a full or partial snapshot into the registry.
    ///
    /// Unknown devices are constructed and inserted; known devices are
    /// updated in place. Devices missing from the snapshot are kept. Entries
    /// without a usable `id` are skipped.
    ///
    /// Returns the identifiers of every device created or updated.
    pub fn upsert_snapshot<I>(&self, raw_devices: I) -> HashSet<DeviceId>
    where
        I: IntoIterator<Item = Attributes>,
    {
        raw_devices
            .into_iter()
            .filter_map(|raw| self.upsert(raw))
            .map(|device| device.device_id().clone())
            .collect()
    }

    /// Merges one raw device into the registry and returns its live handle.
    ///
    /// Returns `None` if the payload carries no usable `id`.
    pub fn upsert(&self, raw: Attributes) -> Option<Device> {
        let Some(id) = raw.get("id").and_then(DeviceId::from_value) else {
            tracing::warn!("Skipping device without an id in snapshot");
            return None;
        };
        Some(self.upsert_as(id, raw))
    }

    /// Merges a raw panel payload as the alarm device of `area`.
    pub fn upsert_panel(&self, panel: Attributes, area: &str) -> Device {
        self.upsert_as(alarm_device_id(area), panel_attributes(panel, area))
    }

    fn upsert_as(&self, id: DeviceId, raw: Attributes) -> Device {
        let existing = match self.devices.entry(id) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                // Construct inside the entry lock so concurrent snapshots cannot
                // create two objects for one id.
                let type_tag = raw
                    .get("type_tag")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let device = Device::new(entry.key().clone(), type_tag, raw);
                tracing::debug!(device_id = %device.device_id(), kind = ?device.kind(), "Registered device");
                return entry.insert(device).value().clone();
            }
        };

        existing.apply_update(raw);
        existing
    }

    /// Looks up a device by identifier.
    #[must_use]
    pub fn get(&self, device_id: &str) -> Option<Device> {
        self.devices.get(device_id).map(|entry| entry.value().clone())
    }

    /// Returns `true` if a device with this identifier is registered.
    #[must_use]
    pub fn contains(&self, device_id: &str) -> bool {
        self.devices.contains_key(device_id)
    }

    /// Returns `true` if `device` is the object this registry holds for its
    /// identifier, rather than an unrelated object with the same id.
    #[must_use]
    pub fn is_registered(&self, device: &Device) -> bool {
        self.devices
            .get(device.device_id().as_str())
            .is_some_and(|entry| entry.value().same_instance(device))
    }

    /// Returns handles to every registered device.
    #[must_use]
    pub fn devices(&self) -> Vec<Device> {
        self.devices
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Returns the number of registered devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns `true` if no device is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Drops every device, e.g. when the session ends.
    pub fn reset(&self) {
        self.devices.clear();
        tracing::debug!("Device registry reset");
    }
}
