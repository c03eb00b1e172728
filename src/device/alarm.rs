// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Synthesis of the alarm device from the panel payload.
//!
//! The panel endpoint does not describe itself as a device. The library
//! turns it into one so that the panel can be looked up, subscribed to and
//! merged exactly like every other device.

use serde_json::Value;

use super::attributes::Attributes;
use super::id::DeviceId;
use super::kind::ALARM_TYPE_TAG;

/// Default display name of the alarm device.
pub const ALARM_NAME: &str = "Abode Alarm";

/// Raw `type` field of the alarm device.
pub const ALARM_TYPE: &str = "Alarm";

/// Prefix of alarm device identifiers; the area number follows.
pub const ALARM_DEVICE_ID_PREFIX: &str = "area_";

/// Identifier of the alarm device for a panel area.
///
/// # Examples
///
/// ```
/// use abode_lib::device::alarm_device_id;
///
/// assert_eq!(alarm_device_id("1").as_str(), "area_1");
/// ```
#[must_use]
pub fn alarm_device_id(area: &str) -> DeviceId {
    DeviceId::new(format!("{ALARM_DEVICE_ID_PREFIX}{area}"))
}

/// Builds the alarm device attributes for `area` out of a raw panel payload.
///
/// The payload is kept whole so that every panel field stays readable; the
/// identity fields a device needs are added on top. An explicit `name` in
/// the payload wins over [`ALARM_NAME`].
#[must_use]
pub fn panel_attributes(mut panel: Attributes, area: &str) -> Attributes {
    let id = alarm_device_id(area);

    if let Some(uuid) = panel
        .get("mac")
        .and_then(Value::as_str)
        .map(|mac| mac.replace(':', "").to_lowercase())
    {
        panel.insert("uuid".to_string(), Value::String(uuid));
    }
    panel
        .entry("name")
        .or_insert_with(|| Value::String(ALARM_NAME.to_string()));
    panel.insert("id".to_string(), Value::String(id.to_string()));
    panel.insert("type".to_string(), Value::String(ALARM_TYPE.to_string()));
    panel.insert(
        "type_tag".to_string(),
        Value::String(ALARM_TYPE_TAG.to_string()),
    );
    panel
}
