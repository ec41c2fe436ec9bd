use anyhow::{anyhow, Context};
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::domain::{Device, DeviceState};

// ─── Device row ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceRow {
    pub id: String,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub state: i64, // 0 available | 1 in-use | 2 inactive
    pub creation_time: DateTime<Utc>,
}

impl DeviceRow {
    /// Fixed-width UTC text so that `ORDER BY creation_time` sorts chronologically.
    pub fn creation_time_text(&self) -> String {
        self.creation_time
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        DeviceRow {
            id: d.id().to_string(),
            name: d.name().map(str::to_string),
            brand: d.brand().map(str::to_string),
            state: d.state().code(),
            creation_time: d.creation_time(),
        }
    }
}

impl TryFrom<DeviceRow> for Device {
    type Error = anyhow::Error;

    fn try_from(row: DeviceRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .with_context(|| format!("Malformed device id in storage: {}", row.id))?;
        let state = DeviceState::from_code(row.state)
            .ok_or_else(|| anyhow!("Unknown device state code {} for device {}", row.state, id))?;

        Ok(Device::restore(id, row.name, row.brand, state, row.creation_time))
    }
}
