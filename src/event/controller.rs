// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Routing of push events to subscribers.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::device::{Device, DeviceId, alarm_device_id};
use crate::error::{Error, Result};
use crate::registry::DeviceRegistry;
use crate::source::DeviceSource;
use crate::subscription::{
    CallbackTable, DeviceCallback, DeviceTarget, EventCallback, GroupTarget, Targets, TimelineKey,
    TimelineTarget, invoke_isolated,
};
use crate::timeline::{self, TimelineGroup};
use crate::types::Mode;

use super::push::{EventKind, PushEvent};

/// Dispatcher between the push channel and registered callbacks.
///
/// Keeps four independent registration tables:
///
/// - device callbacks, keyed by device identifier
/// - timeline callbacks, keyed by event code, group or the wildcard
/// - event-group callbacks, keyed by group
/// - mode-change callbacks
///
/// Push messages enter through [`deliver`](Self::deliver) (or the
/// `on_*` methods directly). Each message is classified, device-scoped
/// messages trigger a refresh through the [`DeviceSource`], and matching
/// callbacks are invoked in registration order. A panicking callback is
/// logged and skipped; the rest of the dispatch continues.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use abode_lib::event::EventController;
/// use abode_lib::registry::DeviceRegistry;
/// use abode_lib::source::HttpConfig;
/// use abode_lib::timeline::TimelineGroup;
///
/// # async fn example() -> abode_lib::Result<()> {
/// let source = Arc::new(HttpConfig::new().with_api_key("key").into_client()?);
/// let registry = Arc::new(DeviceRegistry::new());
/// let events = EventController::new(Arc::clone(&registry), source, "1");
///
/// events.subscribe_event_group(TimelineGroup::Alarm, |record| {
///     println!("alarm: {record}");
/// })?;
/// # Ok(())
/// # }
/// ```
pub struct EventController<S> {
    registry: Arc<DeviceRegistry>,
    source: Arc<S>,
    area: String,
    device_callbacks: CallbackTable<DeviceId, DeviceCallback>,
    timeline_callbacks: CallbackTable<TimelineKey, EventCallback>,
    event_callbacks: CallbackTable<TimelineGroup, EventCallback>,
    mode_callbacks: RwLock<Vec<DeviceCallback>>,
}

impl<S> EventController<S> {
    /// Creates a controller for the alarm of `area`.
    #[must_use]
    pub fn new(registry: Arc<DeviceRegistry>, source: Arc<S>, area: impl Into<String>) -> Self {
        Self {
            registry,
            source,
            area: area.into(),
            device_callbacks: CallbackTable::new(),
            timeline_callbacks: CallbackTable::new(),
            event_callbacks: CallbackTable::new(),
            mode_callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Returns the registry this controller resolves devices against.
    #[must_use]
    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    /// Returns the identifier of the alarm device this controller serves.
    #[must_use]
    pub fn alarm_device_id(&self) -> DeviceId {
        alarm_device_id(&self.area)
    }

    // ========== Device subscriptions ==========

    /// Registers `callback` for updates of one or more devices.
    ///
    /// Targets are identifiers or device objects obtained from the registry,
    /// alone or in a list. The callback is registered once per target.
    ///
    /// Returns `Ok(false)` and registers nothing when there are no targets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] if any target is not a registered
    /// device. Nothing is registered in that case.
    pub fn subscribe_device<T, F>(&self, targets: T, callback: F) -> Result<bool>
    where
        T: Into<Targets<DeviceTarget>>,
        F: Fn(&Device) + Send + Sync + 'static,
    {
        let ids = self.resolve_devices(targets.into())?;
        if ids.is_empty() {
            return Ok(false);
        }

        let callback: DeviceCallback = Arc::new(callback);
        for id in ids {
            tracing::debug!(device_id = %id, "Subscribing to device updates");
            self.device_callbacks.register(id, Arc::clone(&callback));
        }
        Ok(true)
    }

    /// Removes every callback registered for the targeted devices.
    ///
    /// # Errors
    ///
    /// Same as [`subscribe_device`](Self::subscribe_device).
    pub fn unsubscribe_all_device<T>(&self, targets: T) -> Result<bool>
    where
        T: Into<Targets<DeviceTarget>>,
    {
        let ids = self.resolve_devices(targets.into())?;
        if ids.is_empty() {
            return Ok(false);
        }

        for id in ids {
            tracing::debug!(device_id = %id, "Removing device callbacks");
            self.device_callbacks.remove_all(&id);
        }
        Ok(true)
    }

    fn resolve_devices(&self, targets: Targets<DeviceTarget>) -> Result<Vec<DeviceId>> {
        targets
            .into_vec()
            .into_iter()
            .map(|target| match target {
                DeviceTarget::Id(id) if self.registry.contains(id.as_str()) => Ok(id),
                DeviceTarget::Device(device) if self.registry.is_registered(&device) => {
                    Ok(device.device_id().clone())
                }
                other => Err(Error::InvalidDevice(other.to_string())),
            })
            .collect()
    }

    // ========== Timeline subscriptions ==========

    /// Registers `callback` for timeline events.
    ///
    /// Targets are event codes, group names, [`TimelineGroup`]s, the
    /// wildcard [`timeline::ALL`], or timeline records (whose `event_code`
    /// is used).
    ///
    /// Returns `Ok(false)` and registers nothing when there are no targets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimelineEvent`] if a string is not a known
    /// code or group, or a record carries no known code.
    pub fn subscribe_timeline<T, F>(&self, targets: T, callback: F) -> Result<bool>
    where
        T: Into<Targets<TimelineTarget>>,
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let keys = Self::resolve_timeline(targets.into())?;
        if keys.is_empty() {
            return Ok(false);
        }

        let callback: EventCallback = Arc::new(callback);
        for key in keys {
            tracing::debug!(timeline_key = %key, "Subscribing to timeline events");
            self.timeline_callbacks.register(key, Arc::clone(&callback));
        }
        Ok(true)
    }

    /// Removes every callback registered for the targeted timeline keys.
    ///
    /// # Errors
    ///
    /// Same as [`subscribe_timeline`](Self::subscribe_timeline).
    pub fn unsubscribe_all_timeline<T>(&self, targets: T) -> Result<bool>
    where
        T: Into<Targets<TimelineTarget>>,
    {
        let keys = Self::resolve_timeline(targets.into())?;
        if keys.is_empty() {
            return Ok(false);
        }

        for key in keys {
            self.timeline_callbacks.remove_all(&key);
        }
        Ok(true)
    }

    fn resolve_timeline(targets: Targets<TimelineTarget>) -> Result<Vec<TimelineKey>> {
        targets
            .into_vec()
            .into_iter()
            .map(|target| {
                target
                    .resolve()
                    .ok_or_else(|| Error::InvalidTimelineEvent(target.to_string()))
            })
            .collect()
    }

    // ========== Event-group subscriptions ==========

    /// Registers `callback` for every event of one or more groups.
    ///
    /// This is the only way to receive automation edits
    /// ([`TimelineGroup::AutomationEdit`]), which carry no event code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEvent`] if a group name is unknown.
    pub fn subscribe_event_group<T, F>(&self, targets: T, callback: F) -> Result<bool>
    where
        T: Into<Targets<GroupTarget>>,
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let groups = Self::resolve_groups(targets.into())?;
        if groups.is_empty() {
            return Ok(false);
        }

        let callback: EventCallback = Arc::new(callback);
        for group in groups {
            tracing::debug!(event_group = %group, "Subscribing to event group");
            self.event_callbacks.register(group, Arc::clone(&callback));
        }
        Ok(true)
    }

    /// Removes every callback registered for the targeted groups.
    ///
    /// # Errors
    ///
    /// Same as [`subscribe_event_group`](Self::subscribe_event_group).
    pub fn unsubscribe_all_event_group<T>(&self, targets: T) -> Result<bool>
    where
        T: Into<Targets<GroupTarget>>,
    {
        let groups = Self::resolve_groups(targets.into())?;
        if groups.is_empty() {
            return Ok(false);
        }

        for group in groups {
            self.event_callbacks.remove_all(&group);
        }
        Ok(true)
    }

    fn resolve_groups(targets: Targets<GroupTarget>) -> Result<Vec<TimelineGroup>> {
        targets
            .into_vec()
            .into_iter()
            .map(|target| {
                target
                    .resolve()
                    .ok_or_else(|| Error::InvalidEvent(target.to_string()))
            })
            .collect()
    }

    // ========== Mode subscriptions ==========

    /// Registers `callback` for panel mode changes.
    ///
    /// The callback receives the alarm device after the new mode has been
    /// merged into it.
    pub fn subscribe_mode_change<F>(&self, callback: F)
    where
        F: Fn(&Device) + Send + Sync + 'static,
    {
        self.mode_callbacks.write().push(Arc::new(callback));
    }

    /// Removes every mode-change callback. Returns `true` if any existed.
    pub fn unsubscribe_all_mode_change(&self) -> bool {
        let mut callbacks = self.mode_callbacks.write();
        let had_any = !callbacks.is_empty();
        callbacks.clear();
        had_any
    }

    /// Removes every callback from every table.
    pub fn clear(&self) {
        self.device_callbacks.clear();
        self.timeline_callbacks.clear();
        self.event_callbacks.clear();
        self.mode_callbacks.write().clear();
    }

    /// Returns the number of callbacks registered across all tables.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.device_callbacks.total_count()
            + self.timeline_callbacks.total_count()
            + self.event_callbacks.total_count()
            + self.mode_callbacks.read().len()
    }

    // ========== Dispatch ==========

    /// Routes a timeline record to its subscribers.
    ///
    /// Callbacks run in this order: exact code, code's groups, wildcard,
    /// event-group subscribers. A callback reachable through several keys
    /// runs once per key. When the code belongs to a group, that group's
    /// name is written into the record's `event_group` field first. Codes
    /// outside every group still reach exact-code and wildcard subscribers.
    /// Records without a code are ignored.
    pub fn on_timeline_update(&self, mut record: Value) {
        let Some(raw_code) = timeline::code_of(&record) else {
            tracing::warn!(record = %record, "Ignoring timeline event without a code");
            return;
        };
        let code = timeline::normalize_code(&raw_code).unwrap_or(raw_code);
        let groups = timeline::groups_of(&code);
        let primary = groups.first().copied();

        if let (Some(primary), Value::Object(fields)) = (primary, &mut record) {
            fields.insert(
                "event_group".to_string(),
                Value::String(primary.as_str().to_string()),
            );
        }

        let mut callbacks = self
            .timeline_callbacks
            .callbacks(&TimelineKey::Code(code.clone()));
        for group in &groups {
            callbacks.extend(self.timeline_callbacks.callbacks(&TimelineKey::Group(*group)));
        }
        callbacks.extend(self.timeline_callbacks.callbacks(&TimelineKey::All));
        for group in &groups {
            callbacks.extend(self.event_callbacks.callbacks(group));
        }

        tracing::debug!(
            event_code = %code,
            event_group = primary.map_or("none", |group| group.as_str()),
            callbacks = callbacks.len(),
            "Dispatching timeline event"
        );
        for callback in callbacks {
            invoke_isolated(&code, || callback(&record));
        }
    }

    /// Routes an automation edit to the automation-edit group subscribers.
    ///
    /// The payload is passed through unchanged.
    pub fn on_automation_update(&self, payload: &Value) {
        let group = TimelineGroup::AutomationEdit;
        let callbacks = self.event_callbacks.callbacks(&group);
        tracing::debug!(callbacks = callbacks.len(), "Dispatching automation update");
        for callback in callbacks {
            invoke_isolated(group.as_str(), || callback(payload));
        }
    }

    fn invoke_device_callbacks(&self, device: &Device) {
        let callbacks = self.device_callbacks.callbacks(device.device_id().as_str());
        tracing::debug!(
            device_id = %device.device_id(),
            callbacks = callbacks.len(),
            "Dispatching device update"
        );
        for callback in callbacks {
            invoke_isolated(device.device_id().as_str(), || callback(device));
        }
    }
}

impl<S: DeviceSource> EventController<S> {
    /// Refreshes a device and notifies its subscribers.
    ///
    /// Missing or unregistered identifiers are ignored: the push channel
    /// may announce devices before the first snapshot has been loaded. If
    /// the refresh fails the error is logged and no callback runs.
    pub async fn on_device_update(&self, device_id: Option<&str>) {
        let Some(device_id) = device_id.filter(|id| !id.is_empty()) else {
            tracing::debug!("Ignoring device update without an id");
            return;
        };
        let Some(device) = self.registry.get(device_id) else {
            tracing::debug!(device_id = %device_id, "Ignoring update for unknown device");
            return;
        };

        match self.source.fetch_device(device.device_id()).await {
            Ok(update) => device.apply_update(update),
            Err(err) => {
                tracing::warn!(device_id = %device_id, error = %err, "Failed to refresh device");
                return;
            }
        }

        self.invoke_device_callbacks(&device);
    }

    /// Applies a panel mode change and notifies subscribers.
    ///
    /// Missing or unknown modes are ignored. Otherwise the panel is
    /// refreshed, the new mode is merged into the alarm device, and
    /// mode-change subscribers run before the alarm device's own
    /// subscribers.
    pub async fn on_mode_change(&self, mode: Option<&str>) {
        let Some(raw_mode) = mode else {
            tracing::debug!("Ignoring mode change without a mode");
            return;
        };
        let Ok(mode) = raw_mode.parse::<Mode>() else {
            tracing::warn!(mode = %raw_mode, "Ignoring unknown alarm mode");
            return;
        };

        let alarm = match self.source.fetch_panel().await {
            Ok(panel) => Some(self.registry.upsert_panel(panel, &self.area)),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to refresh alarm panel");
                self.registry.get(self.alarm_device_id().as_str())
            }
        };
        let Some(alarm) = alarm else {
            tracing::warn!(area = %self.area, "No alarm device for mode change");
            return;
        };

        let mut modes = Map::new();
        modes.insert(
            alarm.device_id().to_string(),
            Value::String(mode.as_str().to_string()),
        );
        let mut update = Map::new();
        update.insert("mode".to_string(), Value::Object(modes));
        alarm.apply_update(update);

        tracing::info!(device_id = %alarm.device_id(), mode = %mode, "Alarm mode changed");

        let callbacks = self.mode_callbacks.read().clone();
        for callback in callbacks {
            invoke_isolated(alarm.device_id().as_str(), || callback(&alarm));
        }
        self.invoke_device_callbacks(&alarm);
    }

    /// Routes one push message by channel.
    ///
    /// Device payloads may be an id, a list whose first element is the id,
    /// or an object with an `id` field. Mode payloads are the mode name.
    pub async fn deliver(&self, kind: EventKind, payload: Value) {
        tracing::trace!(kind = %kind, payload = %payload, "Push event received");

        match kind {
            EventKind::DeviceUpdate => {
                let device_id = device_id_of(&payload);
                self.on_device_update(device_id.as_ref().map(DeviceId::as_str))
                    .await;
            }
            EventKind::ModeChange => self.on_mode_change(payload.as_str()).await,
            EventKind::Timeline => self.on_timeline_update(payload),
            EventKind::Automation => self.on_automation_update(&payload),
        }
    }

    /// Dispatches push events until the sending side is dropped.
    ///
    /// Events are handled one at a time, in arrival order.
    pub async fn run(&self, mut events: mpsc::Receiver<PushEvent>) {
        tracing::debug!("Starting push event loop");
        while let Some(event) = events.recv().await {
            self.deliver(event.kind, event.payload).await;
        }
        tracing::debug!("Push event loop stopped");
    }
}

/// Extracts a device identifier from a device-update payload.
fn device_id_of(payload: &Value) -> Option<DeviceId> {
    match payload {
        Value::Array(items) => items.first().and_then(device_id_of),
        Value::Object(fields) => fields.get("id").and_then(DeviceId::from_value),
        other => DeviceId::from_value(other),
    }
}

impl<S> fmt::Debug for EventController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventController")
            .field("area", &self.area)
            .field("device_callbacks", &self.device_callbacks)
            .field("timeline_callbacks", &self.timeline_callbacks)
            .field("event_callbacks", &self.event_callbacks)
            .field("mode_callbacks", &self.mode_callbacks.read().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use serde_json::json;

    use crate::device::Attributes;
    use crate::error::ProtocolError;

    /// Source that never answers successfully.
    struct NullSource;

    impl DeviceSource for NullSource {
        async fn fetch_devices(&self) -> Result<Vec<Attributes>> {
            Err(ProtocolError::RequestFailed("offline".to_string()).into())
        }

        async fn fetch_device(&self, _device_id: &DeviceId) -> Result<Attributes> {
            Err(ProtocolError::RequestFailed("offline".to_string()).into())
        }

        async fn fetch_panel(&self) -> Result<Attributes> {
            Err(ProtocolError::RequestFailed("offline".to_string()).into())
        }
    }

    fn controller() -> EventController<NullSource> {
        let registry = Arc::new(DeviceRegistry::new());
        registry.upsert_snapshot([json!({
            "id": "RF:00000001",
            "type_tag": "device_type.door_contact",
            "status": "Closed"
        })
        .as_object()
        .cloned()
        .unwrap()]);
        EventController::new(registry, Arc::new(NullSource), "1")
    }

    fn counter() -> (Arc<AtomicU32>, impl Fn(&Value) + Send + Sync + 'static) {
        let count = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&count);
        (count, move |_: &Value| {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn empty_targets_register_nothing() {
        let events = controller();
        assert!(!events.subscribe_device(None::<&str>, |_| {}).unwrap());
        assert!(!events.unsubscribe_all_device(Vec::<DeviceId>::new()).unwrap());
        assert!(!events.subscribe_timeline(None::<&str>, |_| {}).unwrap());
        assert!(!events.subscribe_event_group(None::<&str>, |_| {}).unwrap());
        assert_eq!(events.subscription_count(), 0);
    }

    #[test]
    fn one_bad_target_rejects_the_whole_list() {
        let events = controller();
        let err = events
            .subscribe_device(vec!["RF:00000001", "RF:nope"], |_| {})
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDevice(id) if id == "RF:nope"));
        assert_eq!(events.subscription_count(), 0);
    }

    #[test]
    fn invalid_timeline_and_group_targets() {
        let events = controller();
        assert!(matches!(
            events.subscribe_timeline("lol", |_| {}),
            Err(Error::InvalidTimelineEvent(_))
        ));
        assert!(matches!(
            events.subscribe_timeline(json!({"lol": "lol"}), |_| {}),
            Err(Error::InvalidTimelineEvent(_))
        ));
        assert!(matches!(
            events.subscribe_event_group("lol", |_| {}),
            Err(Error::InvalidEvent(_))
        ));
    }

    #[test]
    fn timeline_dispatch_order_and_group_injection() {
        let events = controller();
        let seen = Arc::new(RwLock::new(Vec::new()));

        for (label, target) in [
            ("code", TimelineTarget::from(timeline::codes::CAPTURE_IMAGE)),
            ("group", TimelineTarget::from(TimelineGroup::Capture)),
            ("all", TimelineTarget::from(timeline::ALL)),
        ] {
            let seen = Arc::clone(&seen);
            events
                .subscribe_timeline(target, move |record: &Value| {
                    seen.write().push((label, record["event_group"].clone()));
                })
                .unwrap();
        }
        let s = Arc::clone(&seen);
        events
            .subscribe_event_group("abode_capture", move |_| s.write().push(("event", Value::Null)))
            .unwrap();

        events.on_timeline_update(json!({"event_code": "5001", "event_type": "Image Capture"}));

        let seen = seen.read();
        let labels: Vec<_> = seen.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, ["code", "group", "all", "event"]);
        assert_eq!(seen[0].1, "abode_capture");
    }

    #[test]
    fn timeline_without_code_is_ignored() {
        let events = controller();
        let (count, callback) = counter();
        events.subscribe_timeline(timeline::ALL, callback).unwrap();

        events.on_timeline_update(json!({"invalid": "event"}));
        events.on_timeline_update(json!({"event_code": {"nested": 1}}));

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unclassified_code_reaches_wildcard_only() {
        let events = controller();
        let (all, on_all) = counter();
        let (groups, on_group) = counter();
        let on_group = Arc::new(on_group);
        events.subscribe_timeline(timeline::ALL, on_all).unwrap();
        for group in TimelineGroup::ALL {
            let on_group = Arc::clone(&on_group);
            events
                .subscribe_event_group(group, move |record: &Value| on_group(record))
                .unwrap();
        }
        let seen = Arc::new(RwLock::new(None));
        let s = Arc::clone(&seen);
        events
            .subscribe_timeline(timeline::ALL, move |record: &Value| {
                *s.write() = Some(record.clone());
            })
            .unwrap();

        events.on_timeline_update(json!({"event_code": "9999", "event_type": "New Feature"}));

        assert_eq!(all.load(Ordering::SeqCst), 1);
        assert_eq!(groups.load(Ordering::SeqCst), 0);
        let record = seen.read().clone().unwrap();
        assert!(record.get("event_group").is_none());
        assert_eq!(record["event_type"], "New Feature");
    }

    #[test]
    fn padded_and_numeric_codes_match_one_key() {
        let events = controller();
        let (count, callback) = counter();
        assert!(events.subscribe_timeline(" 5001", callback).unwrap());

        events.on_timeline_update(json!({"event_code": "5001"}));
        events.on_timeline_update(json!({"event_code": 5001}));
        events.on_timeline_update(json!({"event_code": "05001"}));

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn automation_reaches_edit_group_only() {
        let events = controller();
        let (edits, on_edit) = counter();
        let (alarms, on_alarm) = counter();
        events
            .subscribe_event_group(TimelineGroup::AutomationEdit, on_edit)
            .unwrap();
        events.subscribe_event_group(TimelineGroup::Alarm, on_alarm).unwrap();

        events.on_automation_update(&json!({"name": "Night"}));

        assert_eq!(edits.load(Ordering::SeqCst), 1);
        assert_eq!(alarms.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clear_drops_all_tables() {
        let events = controller();
        events.subscribe_device("RF:00000001", |_| {}).unwrap();
        events.subscribe_timeline(timeline::ALL, |_| {}).unwrap();
        events.subscribe_mode_change(|_| {});
        assert_eq!(events.subscription_count(), 3);

        events.clear();
        assert_eq!(events.subscription_count(), 0);
        assert!(!events.unsubscribe_all_mode_change());
    }

    #[tokio::test]
    async fn failed_refresh_skips_device_callbacks() {
        let events = controller();
        let count = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&count);
        events
            .subscribe_device("RF:00000001", move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        events.on_device_update(Some("RF:00000001")).await;
        events.on_device_update(None).await;
        events.on_device_update(Some("RF:unknown")).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn mode_change_without_alarm_is_ignored() {
        let events = controller();
        let count = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&count);
        events.subscribe_mode_change(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        events.on_mode_change(Some("home")).await;
        events.on_mode_change(Some("lol")).await;
        events.on_mode_change(None).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn device_payload_shapes() {
        assert_eq!(device_id_of(&json!("RF:1")), Some(DeviceId::from("RF:1")));
        assert_eq!(device_id_of(&json!(["RF:1", "extra"])), Some(DeviceId::from("RF:1")));
        assert_eq!(device_id_of(&json!({"id": "RF:1"})), Some(DeviceId::from("RF:1")));
        assert_eq!(device_id_of(&json!(null)), None);
        assert_eq!(device_id_of(&json!([])), None);
    }
}
