// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed set of device kinds and their state interpretation.
//!
//! A device's kind is chosen once, from its `type_tag`, when the device is
//! first constructed. Every kind-specific accessor on
//! [`Device`](super::Device) is resolved by matching on [`DeviceKind`].

use std::fmt;

use crate::error::UnrecognizedKindError;
use crate::types::{Mode, status};

use super::attributes::{Attributes, as_text};

/// Behavioral family of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// The alarm panel itself.
    Alarm,
    /// Contacts, glass-break, keypads, sirens and other on/off sensors.
    BinarySensor,
    /// Motion and occupancy sensors.
    Motion,
    /// Image and video capture devices.
    Camera,
    /// Garage doors and other secure barriers.
    Cover,
    /// Dimmers and bulbs.
    Light,
    /// Door locks.
    Lock,
    /// Smart plugs and wall switches.
    Switch,
    /// Water shut-off valves.
    Valve,
    /// Temperature, humidity and light multi-sensors.
    Sensor,
    /// Unknown type tag; only the raw attributes are meaningful.
    Generic,
}

/// Coarse category reported to consumers, derived from the type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericType {
    /// Alarm panel.
    Alarm,
    /// Camera.
    Camera,
    /// Device whose main state is reachability.
    Connectivity,
    /// Barrier or garage door.
    Cover,
    /// Light.
    Light,
    /// Lock.
    Lock,
    /// Water leak sensor.
    Moisture,
    /// Motion or occupancy sensor.
    Motion,
    /// Door or window contact.
    Window,
    /// Multi-sensor.
    Sensor,
    /// Switch.
    Switch,
    /// Valve.
    Valve,
    /// Unknown.
    Unknown,
}

impl GenericType {
    /// Returns the lowercase category name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alarm => "alarm",
            Self::Camera => "camera",
            Self::Connectivity => "connectivity",
            Self::Cover => "cover",
            Self::Light => "light",
            Self::Lock => "lock",
            Self::Moisture => "moisture",
            Self::Motion => "motion",
            Self::Window => "window",
            Self::Sensor => "sensor",
            Self::Switch => "switch",
            Self::Valve => "valve",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type tag of the synthesised alarm panel device.
pub const ALARM_TYPE_TAG: &str = "device_type.alarm";

/// Known type tags, matched case-insensitively.
const TYPE_TAGS: &[(&str, DeviceKind, GenericType)] = &[
    (ALARM_TYPE_TAG, DeviceKind::Alarm, GenericType::Alarm),
    // Binary sensors
    ("device_type.door_contact", DeviceKind::BinarySensor, GenericType::Window),
    ("device_type.glass", DeviceKind::BinarySensor, GenericType::Connectivity),
    ("device_type.keypad", DeviceKind::BinarySensor, GenericType::Connectivity),
    ("device_type.remote_controller", DeviceKind::BinarySensor, GenericType::Connectivity),
    ("device_type.siren", DeviceKind::BinarySensor, GenericType::Connectivity),
    ("device_type.bx", DeviceKind::BinarySensor, GenericType::Connectivity),
    ("device_type.water_sensor", DeviceKind::BinarySensor, GenericType::Moisture),
    // Motion
    ("device_type.povs", DeviceKind::Motion, GenericType::Motion),
    ("device_type.pir", DeviceKind::Motion, GenericType::Motion),
    // Cameras
    ("device_type.ir_camera", DeviceKind::Camera, GenericType::Camera),
    ("device_type.ir_camcoder", DeviceKind::Camera, GenericType::Camera),
    ("device_type.ipcam", DeviceKind::Camera, GenericType::Camera),
    ("device_type.out_view_camera", DeviceKind::Camera, GenericType::Camera),
    // Covers
    ("device_type.secure_barrier", DeviceKind::Cover, GenericType::Cover),
    // Lights
    ("device_type.dimmer", DeviceKind::Light, GenericType::Light),
    ("device_type.dimmer_meter", DeviceKind::Light, GenericType::Light),
    ("device_type.hue", DeviceKind::Light, GenericType::Light),
    ("device_type.bulb", DeviceKind::Light, GenericType::Light),
    // Locks
    ("device_type.door_lock", DeviceKind::Lock, GenericType::Lock),
    // Switches
    ("device_type.power_switch_sensor", DeviceKind::Switch, GenericType::Switch),
    ("device_type.power_switch_meter", DeviceKind::Switch, GenericType::Switch),
    ("device_type.switch", DeviceKind::Switch, GenericType::Switch),
    ("device_type.night_switch", DeviceKind::Switch, GenericType::Switch),
    // Valves
    ("device_type.valve", DeviceKind::Valve, GenericType::Valve),
    // Sensors
    ("device_type.lm", DeviceKind::Sensor, GenericType::Sensor),
    ("device_type.temperature_sensor", DeviceKind::Sensor, GenericType::Sensor),
    ("device_type.room_sensor", DeviceKind::Sensor, GenericType::Sensor),
];

impl DeviceKind {
    /// Resolves the kind and generic type for a raw type tag.
    ///
    /// # Errors
    ///
    /// Returns [`UnrecognizedKindError`] when the tag is not in the table.
    /// Callers are expected to fall back to [`DeviceKind::Generic`].
    pub fn classify(type_tag: &str) -> Result<(Self, GenericType), UnrecognizedKindError> {
        TYPE_TAGS
            .iter()
            .find(|(tag, _, _)| tag.eq_ignore_ascii_case(type_tag))
            .map(|(_, kind, generic)| (*kind, *generic))
            .ok_or_else(|| UnrecognizedKindError(type_tag.to_string()))
    }

    /// Kind-specific "on" interpretation of the current attributes.
    pub(crate) fn is_on(self, attributes: &Attributes, device_id: &str) -> bool {
        let current = attributes.get("status").and_then(as_text);
        let current = current.as_deref();

        match self {
            Self::Alarm => alarm_mode(attributes, device_id).is_some_and(|mode| mode.is_armed()),
            Self::BinarySensor => {
                current.is_some_and(|s| ![status::OFF, status::OFFLINE, status::CLOSED].contains(&s))
            }
            Self::Motion => current.is_some_and(|s| s != status::ONLINE),
            Self::Camera => current.is_some_and(|s| s != status::OFFLINE),
            // A barrier is assumed open unless it reports closed.
            Self::Cover | Self::Valve => current != Some(status::CLOSED),
            Self::Light | Self::Switch => current == Some(status::ON),
            Self::Lock => current == Some(status::LOCK_CLOSED),
            Self::Sensor | Self::Generic => false,
        }
    }

    /// Whether the device models something that can be open.
    pub(crate) fn is_openable(self) -> bool {
        matches!(self, Self::BinarySensor | Self::Cover | Self::Valve)
    }
}

/// Reads the mode of `device_id`'s area from a panel's `mode` map.
pub(crate) fn alarm_mode(attributes: &Attributes, device_id: &str) -> Option<Mode> {
    attributes
        .get("mode")
        .and_then(|modes| modes.get(device_id))
        .and_then(serde_json::Value::as_str)
        .and_then(|mode| mode.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn attrs(value: Value) -> Attributes {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn classify_known_tags() {
        assert_eq!(
            DeviceKind::classify("device_type.povs"),
            Ok((DeviceKind::Motion, GenericType::Motion))
        );
        assert_eq!(
            DeviceKind::classify("DEVICE_TYPE.SECURE_BARRIER"),
            Ok((DeviceKind::Cover, GenericType::Cover))
        );
    }

    #[test]
    fn classify_unknown_tag() {
        let err = DeviceKind::classify("device_type.toaster").unwrap_err();
        assert_eq!(err.0, "device_type.toaster");
    }

    #[test]
    fn cover_is_open_unless_closed() {
        assert!(!DeviceKind::Cover.is_on(&attrs(json!({"status": "Closed"})), "x"));
        assert!(DeviceKind::Cover.is_on(&attrs(json!({"status": "Open"})), "x"));
        assert!(DeviceKind::Cover.is_on(&attrs(json!({})), "x"));
    }

    #[test]
    fn binary_sensor_off_states() {
        for off in ["Off", "Offline", "Closed"] {
            assert!(!DeviceKind::BinarySensor.is_on(&attrs(json!({ "status": off })), "x"));
        }
        assert!(DeviceKind::BinarySensor.is_on(&attrs(json!({"status": "Open"})), "x"));
        assert!(DeviceKind::BinarySensor.is_on(&attrs(json!({"status": "Online"})), "x"));
    }

    #[test]
    fn motion_is_on_when_not_idle() {
        assert!(!DeviceKind::Motion.is_on(&attrs(json!({"status": "Online"})), "x"));
        assert!(DeviceKind::Motion.is_on(&attrs(json!({"status": "Motion Detected"})), "x"));
    }

    #[test]
    fn alarm_reads_its_own_area() {
        let panel = attrs(json!({"mode": {"area_1": "away", "area_2": "standby"}}));
        assert!(DeviceKind::Alarm.is_on(&panel, "area_1"));
        assert!(!DeviceKind::Alarm.is_on(&panel, "area_2"));
        assert!(!DeviceKind::Alarm.is_on(&panel, "area_3"));
    }

    #[test]
    fn lock_and_switch() {
        assert!(DeviceKind::Lock.is_on(&attrs(json!({"status": "LockClosed"})), "x"));
        assert!(!DeviceKind::Lock.is_on(&attrs(json!({"status": "LockOpen"})), "x"));
        assert!(DeviceKind::Switch.is_on(&attrs(json!({"status": "On"})), "x"));
        assert!(!DeviceKind::Switch.is_on(&attrs(json!({"status": "Off"})), "x"));
    }

    #[test]
    fn generic_is_never_on() {
        assert!(!DeviceKind::Generic.is_on(&attrs(json!({"status": "On"})), "x"));
    }
}
