// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entry point tying a source, the registry and the event controller
//! together.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::device::{Device, DeviceId, alarm_device_id};
use crate::error::Result;
use crate::event::EventController;
use crate::registry::DeviceRegistry;
use crate::source::DeviceSource;

/// Client-level settings.
///
/// # Examples
///
/// ```
/// use abode_lib::ClientConfig;
///
/// let config = ClientConfig::new().with_area("2");
/// assert_eq!(config.area(), "2");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    area: String,
}

impl ClientConfig {
    /// Panel area served when none is configured.
    pub const DEFAULT_AREA: &'static str = "1";

    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            area: Self::DEFAULT_AREA.to_string(),
        }
    }

    /// Sets the panel area whose alarm device is mirrored.
    #[must_use]
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = area.into();
        self
    }

    /// Returns the panel area.
    #[must_use]
    pub fn area(&self) -> &str {
        &self.area
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Local mirror of one account's devices and alarm panel.
///
/// # Examples
///
/// ```no_run
/// use abode_lib::{Client, HttpConfig};
///
/// # async fn example() -> abode_lib::Result<()> {
/// let client = Client::http(HttpConfig::new().with_api_key("key").with_access_token("token"))?;
///
/// for device in client.get_devices(false).await? {
///     println!("{}", device.description());
/// }
///
/// let door = client.get_device("RF:00000001", false).await?;
/// if let Some(door) = door {
///     client.events().subscribe_device(&door, |device| {
///         println!("{} is now {:?}", device.device_id(), device.status());
///     })?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct Client<S> {
    config: ClientConfig,
    source: Arc<S>,
    registry: Arc<DeviceRegistry>,
    events: Arc<EventController<S>>,
}

impl<S: DeviceSource> Client<S> {
    /// Creates a client with the default configuration.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_config(source, ClientConfig::default())
    }

    /// Creates a client with an explicit configuration.
    #[must_use]
    pub fn with_config(source: S, config: ClientConfig) -> Self {
        let source = Arc::new(source);
        let registry = Arc::new(DeviceRegistry::new());
        let events = Arc::new(EventController::new(
            Arc::clone(&registry),
            Arc::clone(&source),
            config.area(),
        ));

        Self {
            config,
            source,
            registry,
            events,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the device registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    /// Returns the event controller.
    #[must_use]
    pub fn events(&self) -> &Arc<EventController<S>> {
        &self.events
    }

    /// Returns the remote source.
    #[must_use]
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Loads a full snapshot of devices and the panel into the registry.
    ///
    /// Returns the identifiers of every device created or updated,
    /// including the alarm device.
    ///
    /// # Errors
    ///
    /// Returns an error if either fetch fails. Nothing from the failed
    /// fetch is merged.
    pub async fn refresh(&self) -> Result<HashSet<DeviceId>> {
        let devices = self.source.fetch_devices().await?;
        let mut affected = self.registry.upsert_snapshot(devices);

        let panel = self.source.fetch_panel().await?;
        let alarm = self.registry.upsert_panel(panel, self.config.area());
        affected.insert(alarm.device_id().clone());

        tracing::info!(devices = affected.len(), "Device snapshot loaded");
        Ok(affected)
    }

    /// Returns every known device, loading a snapshot first if requested or
    /// if none has been loaded yet.
    ///
    /// # Errors
    ///
    /// Returns an error if a needed snapshot cannot be loaded.
    pub async fn get_devices(&self, refresh: bool) -> Result<Vec<Device>> {
        if refresh || self.registry.is_empty() {
            self.refresh().await?;
        }
        Ok(self.registry.devices())
    }

    /// Returns one device, or `None` if the account has no such device.
    ///
    /// With `refresh`, the device is re-fetched individually and merged
    /// before being returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial snapshot or the refresh fails.
    pub async fn get_device(&self, device_id: &str, refresh: bool) -> Result<Option<Device>> {
        if self.registry.is_empty() {
            self.refresh().await?;
        }
        let Some(device) = self.registry.get(device_id) else {
            return Ok(None);
        };

        if refresh {
            let update = self.source.fetch_device(device.device_id()).await?;
            device.apply_update(update);
        }
        Ok(Some(device))
    }

    /// Returns the alarm device of the configured area.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the panel request fails.
    pub async fn get_alarm(&self, refresh: bool) -> Result<Device> {
        let alarm_id = alarm_device_id(self.config.area());

        if !refresh && let Some(alarm) = self.registry.get(alarm_id.as_str()) {
            return Ok(alarm);
        }

        let panel = self.source.fetch_panel().await?;
        Ok(self.registry.upsert_panel(panel, self.config.area()))
    }

    /// Forgets every device and subscription.
    pub fn logout(&self) {
        self.events.clear();
        self.registry.reset();
        tracing::info!("Client state cleared");
    }
}

#[cfg(feature = "http")]
impl Client<crate::source::HttpClient> {
    /// Creates a client backed by the REST service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn http(config: crate::source::HttpConfig) -> Result<Self> {
        Ok(Self::new(config.into_client()?))
    }
}

impl<S> fmt::Debug for Client<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_area() {
        assert_eq!(ClientConfig::default().area(), ClientConfig::DEFAULT_AREA);
    }
}
