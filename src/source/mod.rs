// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote sources of device snapshots.
//!
//! The registry and the event controller never talk to the network
//! themselves. They pull snapshots through a [`DeviceSource`], which the
//! `http` feature implements on top of `reqwest` ([`HttpClient`]). Tests and
//! embedders can provide their own.

#[cfg(feature = "http")]
mod http;

use std::future::Future;

use crate::device::{Attributes, DeviceId};

#[cfg(feature = "http")]
pub use http::{HttpClient, HttpConfig};

/// Provider of raw device and panel payloads.
///
/// Every method returns the payload exactly as the remote service describes
/// it; merging into live objects is the caller's job.
pub trait DeviceSource: Send + Sync {
    /// Fetches the full device list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not a list
    /// of objects.
    fn fetch_devices(&self) -> impl Future<Output = crate::Result<Vec<Attributes>>> + Send;

    /// Fetches a single device.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not an
    /// object.
    fn fetch_device(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = crate::Result<Attributes>> + Send;

    /// Fetches the alarm panel.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not an
    /// object.
    fn fetch_panel(&self) -> impl Future<Output = crate::Result<Attributes>> + Send;
}
