// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timeline event codes and groups.
//!
//! Every timeline entry carries a numeric event code. Codes are grouped by
//! a static range table so that subscribers can listen to "every alarm" or
//! "every capture" instead of enumerating codes. [`ALL`] is a wildcard that
//! matches every event.

mod event;
mod taxonomy;

pub use event::TimelineEvent;
pub use taxonomy::{
    ALL, TimelineGroup, code_of, codes, groups_of, is_known_code, is_member, normalize_code,
};
