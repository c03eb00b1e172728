// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the library.
//!
//! - [`Mode`] - Alarm panel arming mode (standby/home/away)
//! - [`status`] - Status strings devices report in their `status` attribute

mod mode;
pub mod status;

pub use mode::Mode;
