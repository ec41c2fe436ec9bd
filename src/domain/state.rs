use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a device. Any state may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceState {
    #[default]
    Available,
    InUse,
    Inactive,
}

/// Label table used on the wire, in declaration order.
const STATE_LABELS: [(&str, DeviceState); 3] = [
    ("available", DeviceState::Available),
    ("in-use", DeviceState::InUse),
    ("inactive", DeviceState::Inactive),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid device state: '{}'. Use: {}", .0, DeviceState::valid_labels())]
pub struct InvalidDeviceState(pub String);

impl DeviceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Available => "available",
            DeviceState::InUse => "in-use",
            DeviceState::Inactive => "inactive",
        }
    }

    /// Case-insensitive lookup in the label table.
    pub fn from_label(label: &str) -> Result<Self, InvalidDeviceState> {
        STATE_LABELS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(label))
            .map(|(_, state)| *state)
            .ok_or_else(|| InvalidDeviceState(label.to_string()))
    }

    pub fn valid_labels() -> String {
        STATE_LABELS
            .iter()
            .map(|(label, _)| *label)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Integer code stored in the `state` column.
    pub fn code(&self) -> i64 {
        match self {
            DeviceState::Available => 0,
            DeviceState::InUse => 1,
            DeviceState::Inactive => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(DeviceState::Available),
            1 => Some(DeviceState::InUse),
            2 => Some(DeviceState::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceState {
    type Err = InvalidDeviceState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceState::from_label(s)
    }
}
