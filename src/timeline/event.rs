// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed view over a timeline record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ParseError;

use super::taxonomy::{TimelineGroup, groups_of};

/// A timeline history entry as pushed by the gateway.
///
/// Callbacks receive the raw record; this type is a convenience for
/// consumers that want typed access. Unknown fields are ignored.
///
/// # Examples
///
/// ```
/// use abode_lib::timeline::{TimelineEvent, TimelineGroup};
/// use serde_json::json;
///
/// let record = json!({
///     "event_code": "5001",
///     "event_type": "Image Capture",
///     "event_name": "Living Room Camera Image Capture",
///     "device_id": "ZB:00000305",
///     "event_utc": "1528755898"
/// });
/// let event = TimelineEvent::from_value(&record).unwrap();
/// assert_eq!(event.groups(), vec![TimelineGroup::Capture]);
/// assert_eq!(event.timestamp().unwrap().timestamp(), 1_528_755_898);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimelineEvent {
    /// Contact-ID style event code.
    #[serde(deserialize_with = "string_or_number")]
    pub event_code: String,
    /// Short event description, e.g. "Image Capture".
    #[serde(default)]
    pub event_type: Option<String>,
    /// Human readable event name.
    #[serde(default)]
    pub event_name: Option<String>,
    /// Device the event relates to, if any.
    #[serde(default)]
    pub device_id: Option<String>,
    /// Name of the related device.
    #[serde(default)]
    pub device_name: Option<String>,
    /// User who triggered the event, if any.
    #[serde(default)]
    pub user_name: Option<String>,
    /// Event time as Unix seconds.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub event_utc: Option<String>,
    /// Group name injected during dispatch.
    #[serde(default)]
    pub event_group: Option<String>,
}

impl TimelineEvent {
    /// Parses a raw timeline record.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if the record has no usable `event_code`
    /// or a field has the wrong type.
    pub fn from_value(record: &Value) -> Result<Self, ParseError> {
        Ok(Self::deserialize(record)?)
    }

    /// Groups this event's code belongs to.
    #[must_use]
    pub fn groups(&self) -> Vec<TimelineGroup> {
        groups_of(&self.event_code)
    }

    /// Event time, if `event_utc` holds valid Unix seconds.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let seconds = self.event_utc.as_deref()?.trim().parse::<i64>().ok()?;
        DateTime::from_timestamp(seconds, 0)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_fields_are_accepted() {
        let event = TimelineEvent::from_value(&json!({
            "event_code": 1130,
            "event_utc": 1_528_755_898
        }))
        .unwrap();

        assert_eq!(event.event_code, "1130");
        assert_eq!(event.groups(), vec![TimelineGroup::Alarm]);
        assert!(event.timestamp().is_some());
    }

    #[test]
    fn missing_code_is_rejected() {
        assert!(TimelineEvent::from_value(&json!({"event_name": "x"})).is_err());
        assert!(TimelineEvent::from_value(&json!({"event_code": {"a": 1}})).is_err());
    }

    #[test]
    fn bad_timestamp_is_none() {
        let event =
            TimelineEvent::from_value(&json!({"event_code": "5100", "event_utc": "soon"})).unwrap();
        assert_eq!(event.timestamp(), None);
    }
}
