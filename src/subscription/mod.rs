// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building blocks of the subscription system.
//!
//! - [`CallbackTable`] - keyed callback lists, one per subscription channel
//! - [`Targets`] - what a subscription may be registered against
//! - [`invoke_isolated`] - runs a callback without letting it unwind into
//!   the dispatcher
//!
//! Subscriptions themselves are made through
//! [`EventController`](crate::event::EventController).

mod callback;
mod targets;

pub use callback::{CallbackTable, DeviceCallback, EventCallback, invoke_isolated};
pub use targets::{DeviceTarget, GroupTarget, Targets, TimelineKey, TimelineTarget};
