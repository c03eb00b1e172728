// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `abode_lib` - A Rust library mirroring Abode security systems.
//!
//! The library keeps a local model of an account's devices and alarm panel
//! and keeps it in sync from two directions: REST snapshots pulled through a
//! [`DeviceSource`](source::DeviceSource), and push events delivered to the
//! [`EventController`](event::EventController).
//!
//! # Building Blocks
//!
//! - **Devices** ([`device`]): one live, shared state object per device,
//!   with kind-specific accessors (`is_open`, `is_locked`, `mode`, ...)
//! - **Registry** ([`registry`]): merges snapshots into the live objects
//!   without losing previously known fields
//! - **Timeline** ([`timeline`]): classification of event codes into groups
//! - **Events** ([`event`]): subscriptions by device, timeline code or
//!   group, event group and mode, with panic-isolated dispatch
//!
//! # Quick Start
//!
//! ```no_run
//! use abode_lib::{Client, HttpConfig};
//! use abode_lib::timeline::TimelineGroup;
//!
//! #[tokio::main]
//! async fn main() -> abode_lib::Result<()> {
//!     let client = Client::http(
//!         HttpConfig::new()
//!             .with_api_key("api-key")
//!             .with_access_token("access-token"),
//!     )?;
//!
//!     let alarm = client.get_alarm(false).await?;
//!     println!("Alarm is {:?}", alarm.mode());
//!
//!     client.events().subscribe_mode_change(|alarm| {
//!         println!("Mode changed to {:?}", alarm.mode());
//!     });
//!     client.events().subscribe_event_group(TimelineGroup::Alarm, |record| {
//!         println!("ALARM: {record}");
//!     })?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Push Events
//!
//! The push connection itself is provided by the embedding application.
//! Each message it receives is handed over as an
//! [`EventKind`](event::EventKind) and a JSON payload:
//!
//! ```no_run
//! # use abode_lib::{Client, HttpConfig};
//! # async fn example(client: Client<abode_lib::source::HttpClient>) {
//! use abode_lib::event::EventKind;
//! use serde_json::json;
//!
//! client
//!     .events()
//!     .deliver(EventKind::DeviceUpdate, json!("RF:00000001"))
//!     .await;
//! # }
//! ```

mod client;
pub mod device;
pub mod error;
pub mod event;
pub mod registry;
pub mod source;
pub mod subscription;
pub mod timeline;
pub mod types;

pub use client::{Client, ClientConfig};
pub use device::{Attributes, Device, DeviceId, DeviceKind, GenericType};
pub use error::{Error, ParseError, ProtocolError, Result, UnrecognizedKindError, ValueError};
pub use event::{EventController, EventKind, PushEvent};
pub use registry::DeviceRegistry;
pub use source::DeviceSource;
#[cfg(feature = "http")]
pub use source::{HttpClient, HttpConfig};
pub use timeline::{TimelineEvent, TimelineGroup};
pub use types::Mode;
