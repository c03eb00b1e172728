// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static classification of timeline event codes into groups.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::ValueError;

/// Wildcard pseudo-code matching every timeline event.
pub const ALL: &str = "ALL";

/// Named group of related timeline events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelineGroup {
    /// Burglar, fire, panic and other alarms.
    Alarm,
    /// An alarm was cleared.
    AlarmEnd,
    /// Panel trouble (power, communication, tamper).
    PanelFault,
    /// Panel trouble restored.
    PanelRestore,
    /// The system was disarmed.
    Disarm,
    /// The system was armed.
    Arm,
    /// Arming failed or was forced past faults.
    ArmFault,
    /// Test events.
    Test,
    /// Camera captures.
    Capture,
    /// Device activity (opened, closed, locked...).
    Device,
    /// An automation ran.
    Automation,
    /// An automation was created, edited or removed.
    AutomationEdit,
}

/// Inclusive code ranges and the group they belong to.
const CODE_RANGES: [(u32, u32, TimelineGroup); 11] = [
    (1100, 1199, TimelineGroup::Alarm),
    (3100, 3199, TimelineGroup::AlarmEnd),
    (1300, 1399, TimelineGroup::PanelFault),
    (3300, 3399, TimelineGroup::PanelRestore),
    (1400, 1499, TimelineGroup::Disarm),
    (3400, 3799, TimelineGroup::Arm),
    (1600, 1699, TimelineGroup::Test),
    (5000, 5099, TimelineGroup::Capture),
    (5100, 5199, TimelineGroup::Device),
    (5200, 5299, TimelineGroup::Automation),
    (6000, 6100, TimelineGroup::ArmFault),
];

impl TimelineGroup {
    /// Every group.
    pub const ALL: [Self; 12] = [
        Self::Alarm,
        Self::AlarmEnd,
        Self::PanelFault,
        Self::PanelRestore,
        Self::Disarm,
        Self::Arm,
        Self::ArmFault,
        Self::Test,
        Self::Capture,
        Self::Device,
        Self::Automation,
        Self::AutomationEdit,
    ];

    /// Returns the wire name of the group.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alarm => "abode_alarm",
            Self::AlarmEnd => "abode_alarm_end",
            Self::PanelFault => "abode_panel_fault",
            Self::PanelRestore => "abode_panel_restore",
            Self::Disarm => "abode_disarm",
            Self::Arm => "abode_arm",
            Self::ArmFault => "abode_arm_fault",
            Self::Test => "abode_test",
            Self::Capture => "abode_capture",
            Self::Device => "abode_device",
            Self::Automation => "abode_automation",
            Self::AutomationEdit => "abode_automation_edit",
        }
    }
}

impl fmt::Display for TimelineGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimelineGroup {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| ValueError::InvalidGroup(s.to_string()))
    }
}

/// Returns the groups an event code belongs to.
///
/// Unrecognized or non-numeric codes belong to no group.
///
/// # Examples
///
/// ```
/// use abode_lib::timeline::{TimelineGroup, codes, groups_of};
///
/// assert_eq!(groups_of(codes::CAPTURE_IMAGE), vec![TimelineGroup::Capture]);
/// assert!(groups_of("lol").is_empty());
/// ```
#[must_use]
pub fn groups_of(event_code: &str) -> Vec<TimelineGroup> {
    let Ok(code) = event_code.trim().parse::<u32>() else {
        return Vec::new();
    };
    CODE_RANGES
        .iter()
        .filter(|(low, high, _)| (*low..=*high).contains(&code))
        .map(|(_, _, group)| *group)
        .collect()
}

/// Returns the canonical form of a numeric event code.
///
/// Surrounding whitespace and leading zeros are dropped, so `" 5001"`,
/// `"05001"` and `5001` all map to `"5001"`. Returns `None` if the code is
/// not a number.
///
/// # Examples
///
/// ```
/// use abode_lib::timeline::normalize_code;
///
/// assert_eq!(normalize_code(" 05001").as_deref(), Some("5001"));
/// assert_eq!(normalize_code("lol"), None);
/// ```
#[must_use]
pub fn normalize_code(event_code: &str) -> Option<String> {
    event_code
        .trim()
        .parse::<u32>()
        .ok()
        .map(|code| code.to_string())
}

/// Returns `true` if the code belongs to at least one group.
#[must_use]
pub fn is_known_code(event_code: &str) -> bool {
    !groups_of(event_code).is_empty()
}

/// Extracts the event code from a bare code or a timeline record.
///
/// Accepts a JSON string, a JSON number, or an object carrying an
/// `event_code` field of either shape.
#[must_use]
pub fn code_of(event: &Value) -> Option<String> {
    match event {
        Value::String(code) if !code.is_empty() => Some(code.clone()),
        Value::Number(code) => Some(code.to_string()),
        Value::Object(record) => record
            .get("event_code")
            .filter(|code| !code.is_object())
            .and_then(code_of),
        _ => None,
    }
}

/// Returns `true` if `event` (a bare code or a record) belongs to `group`.
///
/// An event without a recognizable code is never a member.
///
/// # Examples
///
/// ```
/// use abode_lib::timeline::{TimelineGroup, is_member};
/// use serde_json::json;
///
/// assert!(is_member(&json!("5100"), TimelineGroup::Device));
/// assert!(is_member(&json!({"event_code": "1130"}), TimelineGroup::Alarm));
/// assert!(!is_member(&json!({"invalid": "event"}), TimelineGroup::Alarm));
/// ```
#[must_use]
pub fn is_member(event: &Value, group: TimelineGroup) -> bool {
    code_of(event).is_some_and(|code| groups_of(&code).contains(&group))
}

/// Well-known timeline event codes.
pub mod codes {
    /// Burglar alarm.
    pub const BURGLAR_ALARM: &str = "1130";
    /// Fire alarm.
    pub const FIRE_ALARM: &str = "1110";
    /// Panic alarm.
    pub const PANIC_ALARM: &str = "1120";
    /// Alarm cleared.
    pub const ALARM_END: &str = "3130";
    /// Panel lost mains power.
    pub const AC_POWER_LOSS: &str = "1301";
    /// Panel mains power restored.
    pub const AC_POWER_RESTORED: &str = "3301";
    /// Disarmed.
    pub const DISARMED: &str = "1400";
    /// Armed in away mode.
    pub const ARMED_AWAY: &str = "3401";
    /// Armed in home mode.
    pub const ARMED_HOME: &str = "3441";
    /// Panel test report.
    pub const PERIODIC_TEST: &str = "1602";
    /// Image captured.
    pub const CAPTURE_IMAGE: &str = "5001";
    /// Door or window opened.
    pub const OPENED: &str = "5100";
    /// Door or window closed.
    pub const CLOSED: &str = "5101";
    /// Lock locked.
    pub const LOCKED: &str = "5110";
    /// Lock unlocked.
    pub const UNLOCKED: &str = "5111";
    /// Automation triggered.
    pub const AUTOMATION: &str = "5201";
    /// Arming failed because of open sensors.
    pub const ARM_FAULT: &str = "6071";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn range_boundaries() {
        assert_eq!(groups_of("1100"), vec![TimelineGroup::Alarm]);
        assert_eq!(groups_of("1199"), vec![TimelineGroup::Alarm]);
        assert!(groups_of("1200").is_empty());
        assert_eq!(groups_of("3799"), vec![TimelineGroup::Arm]);
        assert_eq!(groups_of("6100"), vec![TimelineGroup::ArmFault]);
        assert!(groups_of("6101").is_empty());
    }

    #[test]
    fn named_codes_are_classified() {
        assert_eq!(groups_of(codes::BURGLAR_ALARM), vec![TimelineGroup::Alarm]);
        assert_eq!(groups_of(codes::ALARM_END), vec![TimelineGroup::AlarmEnd]);
        assert_eq!(groups_of(codes::DISARMED), vec![TimelineGroup::Disarm]);
        assert_eq!(groups_of(codes::ARMED_HOME), vec![TimelineGroup::Arm]);
        assert_eq!(groups_of(codes::OPENED), vec![TimelineGroup::Device]);
        assert_eq!(groups_of(codes::AUTOMATION), vec![TimelineGroup::Automation]);
        assert_eq!(groups_of(codes::ARM_FAULT), vec![TimelineGroup::ArmFault]);
    }

    #[test]
    fn automation_edit_has_no_codes() {
        for code in 0..10_000_u32 {
            assert!(!groups_of(&code.to_string()).contains(&TimelineGroup::AutomationEdit));
        }
    }

    #[test]
    fn unrecognized_codes_match_nothing() {
        assert!(groups_of("").is_empty());
        assert!(groups_of("lol").is_empty());
        assert!(groups_of(ALL).is_empty());
        assert!(!is_known_code("9999"));
    }

    #[test]
    fn code_of_shapes() {
        assert_eq!(code_of(&json!("5001")), Some("5001".to_string()));
        assert_eq!(code_of(&json!(5001)), Some("5001".to_string()));
        assert_eq!(code_of(&json!({"event_code": 5001})), Some("5001".to_string()));
        assert_eq!(code_of(&json!({"event_code": {"nested": 1}})), None);
        assert_eq!(code_of(&json!({"lol": "lol"})), None);
        assert_eq!(code_of(&json!(null)), None);
    }

    #[test]
    fn codes_normalize_to_plain_digits() {
        assert_eq!(normalize_code("5001").as_deref(), Some("5001"));
        assert_eq!(normalize_code(" 5001 ").as_deref(), Some("5001"));
        assert_eq!(normalize_code("05001").as_deref(), Some("5001"));
        assert_eq!(normalize_code("9999").as_deref(), Some("9999"));
        assert_eq!(normalize_code(""), None);
        assert_eq!(normalize_code("-1"), None);
    }

    #[test]
    fn group_names_round_trip() {
        for group in TimelineGroup::ALL {
            assert_eq!(group.as_str().parse::<TimelineGroup>(), Ok(group));
        }
        assert!("lol".parse::<TimelineGroup>().is_err());
    }
}
