// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status strings reported by devices.

/// Device reachable.
pub const ONLINE: &str = "Online";
/// Device unreachable.
pub const OFFLINE: &str = "Offline";

/// Contact or barrier open.
pub const OPEN: &str = "Open";
/// Contact or barrier closed.
pub const CLOSED: &str = "Closed";

/// Lock unlocked.
pub const LOCK_OPEN: &str = "LockOpen";
/// Lock locked.
pub const LOCK_CLOSED: &str = "LockClosed";

/// Switch or light on.
pub const ON: &str = "On";
/// Switch or light off.
pub const OFF: &str = "Off";

/// Key holding the multi-sensor readings.
pub const STATUSES_KEY: &str = "statuses";
/// Key holding the dimmer level of a light.
pub const BRIGHTNESS_KEY: &str = "statusEx";

/// Celsius unit suffix.
pub const UNIT_CELSIUS: &str = "°C";
/// Fahrenheit unit suffix.
pub const UNIT_FAHRENHEIT: &str = "°F";
/// Percentage unit suffix.
pub const UNIT_PERCENT: &str = "%";
/// Illuminance unit suffix.
pub const UNIT_LUX: &str = "lx";
