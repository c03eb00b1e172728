// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live device state objects.
//!
//! A [`Device`] is a cheap, cloneable handle to a single shared state object.
//! The registry owns one per identifier and hands out clones; every clone
//! observes the same attribute map, so a callback that keeps a handle sees
//! every later merge.
//!
//! All accessors are computed from the attribute map on each call. Nothing
//! derived from the attributes is cached.
//!
//! # Examples
//!
//! ```
//! use abode_lib::device::{Device, DeviceKind};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "id": "ZB:00000106",
//!     "type_tag": "device_type.secure_barrier",
//!     "type": "GDO",
//!     "name": "Garage Door",
//!     "status": "Closed",
//!     "faults": {"low_battery": 0, "no_response": 0}
//! });
//! let device = Device::from_attributes(raw.as_object().cloned().unwrap()).unwrap();
//! assert_eq!(device.kind(), DeviceKind::Cover);
//! assert!(!device.is_open());
//!
//! let handle = device.clone();
//! device.apply_update(json!({"status": "Open"}).as_object().cloned().unwrap());
//! assert!(handle.is_open());
//! ```

mod alarm;
mod attributes;
mod id;
mod kind;

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::ParseError;
use crate::types::{Mode, status};

pub use alarm::{ALARM_NAME, ALARM_TYPE, alarm_device_id, panel_attributes};
pub use attributes::{Attributes, merge};
pub use id::DeviceId;
pub use kind::{ALARM_TYPE_TAG, DeviceKind, GenericType};

use attributes::{as_flag, as_reading, as_text};

/// Handle to a live device state object.
///
/// Cloning a `Device` clones the handle, not the state.
#[derive(Clone)]
pub struct Device {
    inner: Arc<DeviceInner>,
}

struct DeviceInner {
    id: DeviceId,
    type_tag: String,
    kind: DeviceKind,
    generic_type: GenericType,
    attributes: RwLock<Attributes>,
}

impl Device {
    /// Constructs a device from its first-seen attributes.
    ///
    /// The kind is selected from `type_tag` and bound for the lifetime of the
    /// object. An unknown tag is logged and the device falls back to
    /// [`DeviceKind::Generic`].
    #[must_use]
    pub fn new(id: DeviceId, type_tag: impl Into<String>, attributes: Attributes) -> Self {
        let type_tag = type_tag.into();
        let (kind, generic_type) = DeviceKind::classify(&type_tag).unwrap_or_else(|err| {
            tracing::warn!(device_id = %id, error = %err, "Falling back to generic device kind");
            (DeviceKind::Generic, GenericType::Unknown)
        });

        Self {
            inner: Arc::new(DeviceInner {
                id,
                type_tag,
                kind,
                generic_type,
                attributes: RwLock::new(attributes),
            }),
        }
    }

    /// Constructs a device from a raw payload carrying `id` and `type_tag`.
    ///
    /// A missing `type_tag` is treated like an unknown one.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingField`] if the payload has no usable `id`.
    pub fn from_attributes(attributes: Attributes) -> Result<Self, ParseError> {
        let id = attributes
            .get("id")
            .and_then(DeviceId::from_value)
            .ok_or_else(|| ParseError::MissingField("id".to_string()))?;
        let type_tag = attributes
            .get("type_tag")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self::new(id, type_tag, attributes))
    }

    /// Deep-merges a partial update into this device's attributes.
    ///
    /// Keys absent from `update` keep their previous values. See [`merge`].
    pub fn apply_update(&self, update: Attributes) {
        merge(&mut *self.inner.attributes.write(), update);
    }

    /// Returns `true` if both handles point at the same state object.
    #[must_use]
    pub fn same_instance(&self, other: &Device) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ========== Identity ==========

    /// Returns the device identifier.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.inner.id
    }

    /// Returns the raw type tag the device was constructed with.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        &self.inner.type_tag
    }

    /// Returns the kind bound at construction.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.inner.kind
    }

    /// Returns the coarse category derived from the type tag.
    #[must_use]
    pub fn generic_type(&self) -> GenericType {
        self.inner.generic_type
    }

    // ========== Raw attributes ==========

    /// Returns a copy of the full attribute map.
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        self.inner.attributes.read().clone()
    }

    /// Returns a copy of a single attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<Value> {
        self.inner.attributes.read().get(key).cloned()
    }

    /// Runs `f` against the attribute map under the read lock.
    pub fn with_attributes<R>(&self, f: impl FnOnce(&Attributes) -> R) -> R {
        f(&*self.inner.attributes.read())
    }

    fn text(&self, key: &str) -> Option<String> {
        self.with_attributes(|attrs| attrs.get(key).and_then(as_text))
    }

    fn fault(&self, key: &str) -> bool {
        self.with_attributes(|attrs| {
            attrs
                .get("faults")
                .and_then(|faults| faults.get(key))
                .is_some_and(as_flag)
        })
    }

    // ========== Common accessors ==========

    /// Display name.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.text("name")
    }

    /// Human readable type, e.g. `Door Contact`.
    #[must_use]
    pub fn type_name(&self) -> Option<String> {
        self.text("type")
    }

    /// Current status string, e.g. `Open` or `Online`.
    #[must_use]
    pub fn status(&self) -> Option<String> {
        self.text("status")
    }

    /// Device UUID.
    #[must_use]
    pub fn uuid(&self) -> Option<String> {
        self.text("uuid")
    }

    /// Alarm area the device belongs to.
    #[must_use]
    pub fn area(&self) -> Option<String> {
        self.text("area")
    }

    /// Alarm zone the device is wired to.
    #[must_use]
    pub fn zone(&self) -> Option<String> {
        self.text("zone")
    }

    /// Whether the device reports a low battery.
    #[must_use]
    pub fn battery_low(&self) -> bool {
        self.fault("low_battery")
    }

    /// Whether the device stopped answering the panel.
    #[must_use]
    pub fn no_response(&self) -> bool {
        self.fault("no_response")
    }

    /// Whether the device reports an out-of-order fault.
    #[must_use]
    pub fn out_of_order(&self) -> bool {
        self.fault("out_of_order")
    }

    /// Whether the device enclosure was tampered with.
    #[must_use]
    pub fn tampered(&self) -> bool {
        self.with_attributes(|attrs| attrs.get("tampered").is_some_and(as_flag))
    }

    /// One-line summary for logs.
    #[must_use]
    pub fn description(&self) -> String {
        format!(
            "{} (ID: {}, UUID: {}) - {} - {}",
            self.name().unwrap_or_default(),
            self.device_id(),
            self.uuid().unwrap_or_default(),
            self.type_name().unwrap_or_default(),
            self.status().unwrap_or_default(),
        )
    }

    // ========== Kind-specific accessors ==========

    /// Kind-specific on state: armed for the alarm, open for barriers,
    /// triggered for sensors, on for lights and switches.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.with_attributes(|attrs| self.inner.kind.is_on(attrs, self.inner.id.as_str()))
    }

    /// Whether a contact, cover or valve is open. Always `false` for kinds
    /// that cannot be open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.kind.is_openable() && self.is_on()
    }

    /// Whether a lock is locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.inner.kind == DeviceKind::Lock
            && self.status().as_deref() == Some(status::LOCK_CLOSED)
    }

    /// Dimmer level of a light.
    #[must_use]
    pub fn brightness(&self) -> Option<f64> {
        if self.inner.kind != DeviceKind::Light {
            return None;
        }
        self.with_attributes(|attrs| attrs.get(status::BRIGHTNESS_KEY).and_then(as_reading))
    }

    fn reading(&self, key: &str) -> Option<f64> {
        if self.inner.kind != DeviceKind::Sensor {
            return None;
        }
        self.with_attributes(|attrs| {
            attrs
                .get(status::STATUSES_KEY)
                .and_then(|statuses| statuses.get(key))
                .and_then(as_reading)
        })
    }

    /// Temperature reading of a multi-sensor.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.reading("temperature")
    }

    /// Unit of [`temperature`](Self::temperature), defaulting to Celsius.
    #[must_use]
    pub fn temperature_unit(&self) -> &'static str {
        let fahrenheit = self.with_attributes(|attrs| {
            attrs
                .get(status::STATUSES_KEY)
                .and_then(|statuses| statuses.get("temperature"))
                .and_then(Value::as_str)
                .is_some_and(|reading| reading.contains(status::UNIT_FAHRENHEIT))
        });
        if fahrenheit {
            status::UNIT_FAHRENHEIT
        } else {
            status::UNIT_CELSIUS
        }
    }

    /// Relative humidity reading of a multi-sensor, in percent.
    #[must_use]
    pub fn humidity(&self) -> Option<f64> {
        self.reading("humidity")
    }

    /// Illuminance reading of a multi-sensor, in lux.
    #[must_use]
    pub fn lux(&self) -> Option<f64> {
        self.reading("lux")
    }

    // ========== Alarm accessors ==========

    /// Current mode of the alarm's area. `None` for other kinds.
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        if self.inner.kind != DeviceKind::Alarm {
            return None;
        }
        self.with_attributes(|attrs| kind::alarm_mode(attrs, self.inner.id.as_str()))
    }

    /// Whether the alarm is armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.mode().is_some_and(|mode| mode.is_armed())
    }

    /// Whether the panel is on cellular backup.
    #[must_use]
    pub fn is_cellular(&self) -> bool {
        self.with_attributes(|attrs| attrs.get("is_cellular").is_some_and(as_flag))
    }

    /// Whether the panel is running on battery.
    #[must_use]
    pub fn on_battery(&self) -> bool {
        self.with_attributes(|attrs| attrs.get("battery").is_some_and(as_flag))
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.inner.id)
            .field("type_tag", &self.inner.type_tag)
            .field("kind", &self.inner.kind)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
