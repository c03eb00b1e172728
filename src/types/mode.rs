// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Alarm panel modes.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Arming mode of an alarm panel area.
///
/// # Examples
///
/// ```
/// use abode_lib::types::Mode;
///
/// let mode: Mode = "home".parse().unwrap();
/// assert!(mode.is_armed());
/// assert!(!Mode::Standby.is_armed());
/// assert!("lol".parse::<Mode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Disarmed.
    Standby,
    /// Armed with occupants at home.
    Home,
    /// Armed with the premises empty.
    Away,
}

/// Mode to armed flag.
const ARMED: [(Mode, bool); 3] = [
    (Mode::Standby, false),
    (Mode::Home, true),
    (Mode::Away, true),
];

impl Mode {
    /// Every mode, in the order the panel documents them.
    pub const ALL: [Self; 3] = [Self::Standby, Self::Home, Self::Away];

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standby => "standby",
            Self::Home => "home",
            Self::Away => "away",
        }
    }

    /// Returns `true` if the panel is armed in this mode.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        ARMED
            .iter()
            .find(|(mode, _)| mode == self)
            .is_some_and(|(_, armed)| *armed)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ValueError::InvalidMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armed_table() {
        assert!(!Mode::Standby.is_armed());
        assert!(Mode::Home.is_armed());
        assert!(Mode::Away.is_armed());
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!("away".parse::<Mode>(), Ok(Mode::Away));
        assert!("Away".parse::<Mode>().is_err());
        assert!("".parse::<Mode>().is_err());
    }

    #[test]
    fn display_matches_wire_name() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }
}
