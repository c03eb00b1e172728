// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription targets.
//!
//! Subscribe operations accept a single target, a list of targets, or
//! nothing at all. [`Targets`] is the common shape: anything convertible
//! into it can be passed where a subscription expects targets.
//!
//! ```
//! use abode_lib::subscription::{DeviceTarget, Targets};
//!
//! let one: Targets<DeviceTarget> = "RF:1".into();
//! let many: Targets<DeviceTarget> = vec!["RF:1", "RF:2"].into();
//! let none: Targets<DeviceTarget> = None::<&str>.into();
//!
//! assert_eq!(one.len(), 1);
//! assert_eq!(many.len(), 2);
//! assert!(none.is_empty());
//! ```

use std::fmt;

use serde_json::Value;

use crate::device::{Device, DeviceId};
use crate::timeline::{self, TimelineGroup};

/// Zero or more subscription targets of one kind.
#[derive(Debug, Clone)]
pub struct Targets<T>(Vec<T>);

impl<T> Targets<T> {
    /// No targets; subscribing with this registers nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Returns `true` if there are no targets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Consumes the targets.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T, U: Into<T>> From<Vec<U>> for Targets<T> {
    fn from(items: Vec<U>) -> Self {
        Self(items.into_iter().map(Into::into).collect())
    }
}

impl<T, U: Into<T>, const N: usize> From<[U; N]> for Targets<T> {
    fn from(items: [U; N]) -> Self {
        Self(items.into_iter().map(Into::into).collect())
    }
}

impl<T, U: Clone + Into<T>> From<&[U]> for Targets<T> {
    fn from(items: &[U]) -> Self {
        Self(items.iter().cloned().map(Into::into).collect())
    }
}

impl<T, U: Into<T>> From<Option<U>> for Targets<T> {
    fn from(item: Option<U>) -> Self {
        Self(item.into_iter().map(Into::into).collect())
    }
}

/// Implements single-item conversions into `Targets<$target>`.
macro_rules! single_target {
    ($target:ty: $($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for Targets<$target> {
                fn from(item: $source) -> Self {
                    Self(vec![item.into()])
                }
            }
        )+
    };
}

// ========== Devices ==========

/// A device referenced by identifier or by object.
#[derive(Debug, Clone)]
pub enum DeviceTarget {
    /// Device identifier.
    Id(DeviceId),
    /// Device object; must be the one held by the registry.
    Device(Device),
}

impl DeviceTarget {
    /// Identifier the target refers to.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::Id(id) => id,
            Self::Device(device) => device.device_id(),
        }
    }
}

impl fmt::Display for DeviceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.device_id(), f)
    }
}

impl From<&str> for DeviceTarget {
    fn from(id: &str) -> Self {
        Self::Id(DeviceId::from(id))
    }
}

impl From<String> for DeviceTarget {
    fn from(id: String) -> Self {
        Self::Id(DeviceId::from(id))
    }
}

impl From<DeviceId> for DeviceTarget {
    fn from(id: DeviceId) -> Self {
        Self::Id(id)
    }
}

impl From<&DeviceId> for DeviceTarget {
    fn from(id: &DeviceId) -> Self {
        Self::Id(id.clone())
    }
}

impl From<Device> for DeviceTarget {
    fn from(device: Device) -> Self {
        Self::Device(device)
    }
}

impl From<&Device> for DeviceTarget {
    fn from(device: &Device) -> Self {
        Self::Device(device.clone())
    }
}

single_target!(DeviceTarget: DeviceTarget, &str, String, DeviceId, &DeviceId, Device, &Device);

// ========== Timeline ==========

/// Registration key in the timeline table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimelineKey {
    /// Wildcard matching every event.
    All,
    /// One exact event code.
    Code(String),
    /// Every code of a group.
    Group(TimelineGroup),
}

impl fmt::Display for TimelineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(timeline::ALL),
            Self::Code(code) => f.write_str(code),
            Self::Group(group) => fmt::Display::fmt(group, f),
        }
    }
}

/// A timeline subscription target as given by the caller.
#[derive(Debug, Clone)]
pub enum TimelineTarget {
    /// An event code, a group name, or the wildcard.
    Key(String),
    /// A group.
    Group(TimelineGroup),
    /// A timeline record carrying an `event_code`.
    Record(Value),
}

impl TimelineTarget {
    /// Resolves the target to a table key.
    ///
    /// Returns `None` for an unknown string or a record without a known code.
    #[must_use]
    pub fn resolve(&self) -> Option<TimelineKey> {
        match self {
            Self::Key(key) if key == timeline::ALL => Some(TimelineKey::All),
            Self::Key(key) if timeline::is_known_code(key) => {
                timeline::normalize_code(key).map(TimelineKey::Code)
            }
            Self::Key(key) => key.parse().ok().map(TimelineKey::Group),
            Self::Group(group) => Some(TimelineKey::Group(*group)),
            Self::Record(record) => match record {
                // A bare JSON string is treated like a key.
                Value::String(key) => Self::Key(key.clone()).resolve(),
                _ => timeline::code_of(record)
                    .filter(|code| timeline::is_known_code(code))
                    .and_then(|code| timeline::normalize_code(&code))
                    .map(TimelineKey::Code),
            },
        }
    }
}

impl fmt::Display for TimelineTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Group(group) => fmt::Display::fmt(group, f),
            Self::Record(record) => fmt::Display::fmt(record, f),
        }
    }
}

impl From<&str> for TimelineTarget {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for TimelineTarget {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<TimelineGroup> for TimelineTarget {
    fn from(group: TimelineGroup) -> Self {
        Self::Group(group)
    }
}

impl From<Value> for TimelineTarget {
    fn from(record: Value) -> Self {
        Self::Record(record)
    }
}

impl From<&Value> for TimelineTarget {
    fn from(record: &Value) -> Self {
        Self::Record(record.clone())
    }
}

single_target!(TimelineTarget: TimelineTarget, &str, String, TimelineGroup, Value, &Value);

// ========== Event groups ==========

/// An event group given by name or by value.
#[derive(Debug, Clone)]
pub enum GroupTarget {
    /// Group wire name, e.g. `abode_automation_edit`.
    Name(String),
    /// A group.
    Group(TimelineGroup),
}

impl GroupTarget {
    /// Resolves the target to a group, or `None` for an unknown name.
    #[must_use]
    pub fn resolve(&self) -> Option<TimelineGroup> {
        match self {
            Self::Name(name) => name.parse().ok(),
            Self::Group(group) => Some(*group),
        }
    }
}

impl fmt::Display for GroupTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Group(group) => fmt::Display::fmt(group, f),
        }
    }
}

impl From<&str> for GroupTarget {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for GroupTarget {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<TimelineGroup> for GroupTarget {
    fn from(group: TimelineGroup) -> Self {
        Self::Group(group)
    }
}

single_target!(GroupTarget: GroupTarget, &str, String, TimelineGroup);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_targets_from_mixed_shapes() {
        let device = Device::from_attributes(
            json!({"id": "RF:2", "type_tag": "device_type.pir"})
                .as_object()
                .cloned()
                .unwrap(),
        )
        .unwrap();
        let targets: Targets<DeviceTarget> =
            vec![DeviceTarget::from("RF:1"), DeviceTarget::from(&device)].into();

        let ids: Vec<String> = targets
            .into_vec()
            .iter()
            .map(|t| t.device_id().to_string())
            .collect();
        assert_eq!(ids, ["RF:1", "RF:2"]);
    }

    #[test]
    fn none_is_empty() {
        assert!(Targets::<DeviceTarget>::from(None::<DeviceId>).is_empty());
        assert!(Targets::<TimelineTarget>::from(Vec::<String>::new()).is_empty());
        assert!(Targets::<GroupTarget>::empty().is_empty());
    }

    #[test]
    fn timeline_key_resolution() {
        assert_eq!(TimelineTarget::from("ALL").resolve(), Some(TimelineKey::All));
        assert_eq!(
            TimelineTarget::from("5100").resolve(),
            Some(TimelineKey::Code("5100".to_string()))
        );
        assert_eq!(
            TimelineTarget::from("abode_capture").resolve(),
            Some(TimelineKey::Group(TimelineGroup::Capture))
        );
        assert_eq!(TimelineTarget::from("lol").resolve(), None);
        assert_eq!(TimelineTarget::from("9999").resolve(), None);
    }

    #[test]
    fn code_keys_are_normalized() {
        let expected = Some(TimelineKey::Code("5001".to_string()));
        assert_eq!(TimelineTarget::from(" 5001").resolve(), expected);
        assert_eq!(TimelineTarget::from("05001").resolve(), expected);
        assert_eq!(TimelineTarget::from(json!(5001)).resolve(), expected);
        assert_eq!(TimelineTarget::from(json!({"event_code": 5001})).resolve(), expected);
    }

    #[test]
    fn timeline_record_resolution() {
        assert_eq!(
            TimelineTarget::from(json!({"event_code": "5001", "event_name": "Image Capture"}))
                .resolve(),
            Some(TimelineKey::Code("5001".to_string()))
        );
        assert_eq!(TimelineTarget::from(json!({"lol": "lol"})).resolve(), None);
        assert_eq!(
            TimelineTarget::from(json!("abode_alarm")).resolve(),
            Some(TimelineKey::Group(TimelineGroup::Alarm))
        );
    }

    #[test]
    fn group_resolution() {
        assert_eq!(
            GroupTarget::from("abode_automation_edit").resolve(),
            Some(TimelineGroup::AutomationEdit)
        );
        assert_eq!(GroupTarget::from("abode_nope").resolve(), None);
    }
}
