// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw attribute maps and the deep merge applied to them.

use serde_json::{Map, Value};

/// Last-known remote state of a device, as delivered by the service.
pub type Attributes = Map<String, Value>;

/// Deep-merges `update` into `target`.
///
/// For every key in `update`: when both sides hold an object the two are
/// merged recursively, otherwise the incoming value replaces the existing
/// one. Keys present only in `target` are left untouched, so merging the
/// same payload twice yields the same result as merging it once.
///
/// # Examples
///
/// ```
/// use abode_lib::device::merge;
/// use serde_json::json;
///
/// let mut state = json!({"status": "Closed", "faults": {"low_battery": 0, "no_response": 0}});
/// let update = json!({"status": "Open", "faults": {"low_battery": 1}});
///
/// merge(state.as_object_mut().unwrap(), update.as_object().unwrap().clone());
///
/// assert_eq!(state["status"], "Open");
/// assert_eq!(state["faults"]["low_battery"], 1);
/// assert_eq!(state["faults"]["no_response"], 0);
/// ```
pub fn merge(target: &mut Attributes, update: Attributes) {
    for (key, incoming) in update {
        match incoming {
            Value::Object(nested) => {
                if let Some(Value::Object(existing)) = target.get_mut(&key) {
                    merge(existing, nested);
                } else {
                    target.insert(key, Value::Object(nested));
                }
            }
            incoming => {
                target.insert(key, incoming);
            }
        }
    }
}

/// Reads a value as display text: strings as-is, numbers and booleans rendered.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a fault-style flag. The service mixes `1`, `"1"` and `true`.
pub(crate) fn as_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|v| v == 1),
        Value::String(s) => s.trim().parse::<i64>().is_ok_and(|v| v == 1),
        _ => false,
    }
}

/// Reads the leading number of a reading such as `"21.5 °C"` or `"40 %"`.
pub(crate) fn as_reading(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            let end = s
                .char_indices()
                .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-')))
                .map_or(s.len(), |(i, _)| i);
            s[..end].parse().ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn merge_keeps_keys_missing_from_update() {
        let mut state = object(json!({"a": 1}));
        merge(&mut state, object(json!({"b": 2})));

        assert_eq!(state.get("a"), Some(&json!(1)));
        assert_eq!(state.get("b"), Some(&json!(2)));
    }

    #[test]
    fn merge_recurses_into_nested_objects() {
        let mut state = object(json!({"mode": {"area_1": "standby", "area_2": "away"}}));
        merge(&mut state, object(json!({"mode": {"area_1": "home"}})));

        assert_eq!(
            Value::Object(state),
            json!({"mode": {"area_1": "home", "area_2": "away"}})
        );
    }

    #[test]
    fn merge_replaces_when_shapes_differ() {
        let mut state = object(json!({"statuses": {"temperature": "20"}, "status": "Open"}));
        merge(
            &mut state,
            object(json!({"statuses": "n/a", "status": {"code": 1}})),
        );

        assert_eq!(state.get("statuses"), Some(&json!("n/a")));
        assert_eq!(state.get("status"), Some(&json!({"code": 1})));
    }

    #[test]
    fn merge_is_idempotent() {
        let update = object(json!({"status": "Open", "faults": {"low_battery": 1}}));
        let mut once = object(json!({"status": "Closed", "faults": {"no_response": 0}}));
        merge(&mut once, update.clone());
        let mut twice = once.clone();
        merge(&mut twice, update);

        assert_eq!(once, twice);
    }

    #[test]
    fn flag_shapes() {
        assert!(as_flag(&json!(1)));
        assert!(as_flag(&json!("1")));
        assert!(as_flag(&json!(true)));
        assert!(!as_flag(&json!(0)));
        assert!(!as_flag(&json!("0")));
        assert!(!as_flag(&json!(null)));
    }

    #[test]
    fn reading_strips_units() {
        assert_eq!(as_reading(&json!("21.5 °C")), Some(21.5));
        assert_eq!(as_reading(&json!("-3 °F")), Some(-3.0));
        assert_eq!(as_reading(&json!("40 %")), Some(40.0));
        assert_eq!(as_reading(&json!(14)), Some(14.0));
        assert_eq!(as_reading(&json!("unknown")), None);
    }
}
