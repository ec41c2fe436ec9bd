use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::state::DeviceState;

/// Mutations blocked while a device is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedOperation {
    Rename,
    Rebrand,
    Delete,
}

impl fmt::Display for GuardedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GuardedOperation::Rename => "rename",
            GuardedOperation::Rebrand => "rebrand",
            GuardedOperation::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot {operation} a device that is in use.")]
pub struct DeviceInUse {
    pub operation: GuardedOperation,
}

/// The device aggregate.
///
/// Fields are private: `name` and `brand` only change through [`Device::rename`]
/// and [`Device::rebrand`], which refuse while the device is in use.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    id: Uuid,
    name: Option<String>,
    brand: Option<String>,
    state: DeviceState,
    creation_time: DateTime<Utc>,
}

impl Device {
    /// Build a new device with a fresh id, stamped with the current time.
    pub fn create(name: Option<String>, brand: Option<String>, state: Option<DeviceState>) -> Self {
        Self::create_at(name, brand, state, Utc::now())
    }

    pub fn create_at(
        name: Option<String>,
        brand: Option<String>,
        state: Option<DeviceState>,
        creation_time: DateTime<Utc>,
    ) -> Self {
        Device {
            id: Uuid::new_v4(),
            name,
            brand,
            state: state.unwrap_or_default(),
            creation_time,
        }
    }

    /// Rebuild a device from stored values.
    pub fn restore(
        id: Uuid,
        name: Option<String>,
        brand: Option<String>,
        state: DeviceState,
        creation_time: DateTime<Utc>,
    ) -> Self {
        Device {
            id,
            name,
            brand,
            state,
            creation_time,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    pub fn is_in_use(&self) -> bool {
        self.state == DeviceState::InUse
    }

    pub fn rename(&mut self, new_name: Option<String>) -> Result<(), DeviceInUse> {
        self.ensure_not_in_use(GuardedOperation::Rename)?;
        self.name = new_name;
        Ok(())
    }

    pub fn rebrand(&mut self, new_brand: Option<String>) -> Result<(), DeviceInUse> {
        self.ensure_not_in_use(GuardedOperation::Rebrand)?;
        self.brand = new_brand;
        Ok(())
    }

    /// No transition rules: every state is reachable from every other.
    pub fn change_state(&mut self, new_state: DeviceState) {
        self.state = new_state;
    }

    pub fn ensure_can_be_deleted(&self) -> Result<(), DeviceInUse> {
        self.ensure_not_in_use(GuardedOperation::Delete)
    }

    fn ensure_not_in_use(&self, operation: GuardedOperation) -> Result<(), DeviceInUse> {
        if self.is_in_use() {
            return Err(DeviceInUse { operation });
        }
        Ok(())
    }
}
