// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Push event routing.
//!
//! The transport that maintains the push connection is not part of this
//! crate. It hands each parsed message to the [`EventController`], either
//! directly through [`EventController::deliver`] or by feeding a channel
//! drained by [`EventController::run`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use abode_lib::event::{EventController, EventKind, PushEvent};
//! use abode_lib::registry::DeviceRegistry;
//! use abode_lib::source::HttpConfig;
//! use serde_json::json;
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> abode_lib::Result<()> {
//! let source = Arc::new(HttpConfig::new().into_client()?);
//! let events = Arc::new(EventController::new(
//!     Arc::new(DeviceRegistry::new()),
//!     source,
//!     "1",
//! ));
//!
//! let (tx, rx) = mpsc::channel(64);
//! let pump = Arc::clone(&events);
//! tokio::spawn(async move { pump.run(rx).await });
//!
//! tx.send(PushEvent::new(EventKind::ModeChange, json!("away")))
//!     .await
//!     .ok();
//! # Ok(())
//! # }
//! ```

mod controller;
mod push;

pub use controller::EventController;
pub use push::{EventKind, PushEvent};
