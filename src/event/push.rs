// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Push event channels.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::ValueError;

/// Channel a push message arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A device changed; the payload names the device.
    DeviceUpdate,
    /// The panel changed mode; the payload is the mode name.
    ModeChange,
    /// A timeline entry was recorded; the payload is the record.
    Timeline,
    /// An automation was edited; the payload is passed through.
    Automation,
}

impl EventKind {
    /// Every channel.
    pub const ALL: [Self; 4] = [
        Self::DeviceUpdate,
        Self::ModeChange,
        Self::Timeline,
        Self::Automation,
    ];

    /// Returns the channel name used by the push service.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceUpdate => "com.goabode.device.update",
            Self::ModeChange => "com.goabode.gateway.mode",
            Self::Timeline => "com.goabode.gateway.timeline",
            Self::Automation => "com.goabode.automation",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValueError::InvalidEventKind(s.to_string()))
    }
}

/// A parsed push message ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct PushEvent {
    /// Channel the message arrived on.
    pub kind: EventKind,
    /// Message body.
    pub payload: Value,
}

impl PushEvent {
    /// Creates a push event.
    #[must_use]
    pub fn new(kind: EventKind, payload: Value) -> Self {
        Self { kind, payload }
    }

    /// Creates a push event from a raw channel name.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidEventKind`] for an unknown channel.
    pub fn from_channel(channel: &str, payload: Value) -> Result<Self, ValueError> {
        Ok(Self::new(channel.parse()?, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn channel_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_channel_is_rejected() {
        assert_eq!(
            "com.goabode.nope".parse::<EventKind>(),
            Err(ValueError::InvalidEventKind("com.goabode.nope".to_string()))
        );
        assert!(PushEvent::from_channel("com.goabode.nope", json!(null)).is_err());
    }

    #[test]
    fn from_channel() {
        let event = PushEvent::from_channel("com.goabode.gateway.mode", json!("away")).unwrap();
        assert_eq!(event.kind, EventKind::ModeChange);
        assert_eq!(event.payload, json!("away"));
    }
}
