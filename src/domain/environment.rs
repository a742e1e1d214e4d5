//! Home environment devices

use crate::domain::record::{merge, merge_opt, nullable, Record, RecordId, Timestamps};
use crate::domain::store::{Persisted, Store};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Light,
    Thermostat,
    Lock,
    Plug,
    Sensor,
    Blind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: RecordId,
    pub name: String,
    pub room: String,
    pub kind: DeviceKind,
    pub powered: bool,
    /// Brightness, temperature or position depending on kind
    pub level: Option<f64>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceDraft {
    pub name: String,
    pub room: String,
    pub kind: DeviceKind,
    #[serde(default)]
    pub powered: bool,
    #[serde(default)]
    pub level: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevicePatch {
    pub name: Option<String>,
    pub room: Option<String>,
    pub kind: Option<DeviceKind>,
    pub powered: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub level: Option<Option<f64>>,
}

impl Device {
    /// Flip power, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.powered = !self.powered;
        self.powered
    }
}

impl Record for Device {
    type Draft = DeviceDraft;
    type Patch = DevicePatch;
    const KIND: &'static str = "device";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: DeviceDraft, now: DateTime<Utc>) -> Self {
        Device {
            id,
            name: draft.name,
            room: draft.room,
            kind: draft.kind,
            powered: draft.powered,
            level: draft.level,
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: DevicePatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.room, patch.room);
        merge(&mut self.kind, patch.kind);
        merge(&mut self.powered, patch.powered);
        merge_opt(&mut self.level, patch.level);
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        let power = if self.powered { "on" } else { "off" };
        match self.level {
            Some(level) => format!("{} / {} ({:?}, {}, {})", self.room, self.name, self.kind, power, level),
            None => format!("{} / {} ({:?}, {})", self.room, self.name, self.kind, power),
        }
    }
}

pub type DeviceStore = Store<Device>;

impl Persisted for Store<Device> {
    const KEY: &'static str = "environment";

    fn seed(now: DateTime<Utc>) -> Self {
        let device = |name: &str, room: &str, kind, powered, level| DeviceDraft {
            name: name.to_string(),
            room: room.to_string(),
            kind,
            powered,
            level,
        };
        let drafts = vec![
            device("Ceiling light", "living room", DeviceKind::Light, true, Some(80.0)),
            device("Thermostat", "hallway", DeviceKind::Thermostat, true, Some(21.5)),
            device("Front door", "hallway", DeviceKind::Lock, true, None),
            device("Desk lamp", "office", DeviceKind::Light, false, Some(60.0)),
        ];
        Store::seeded(drafts, now)
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

impl Store<Device> {
    pub fn in_room(&self, room: &str) -> Vec<&Device> {
        self.filter(|d| d.room.eq_ignore_ascii_case(room))
    }

    pub fn powered_on(&self) -> Vec<&Device> {
        self.filter(|d| d.powered)
    }
}
