use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::error::AppResult;
use crate::domain::{Device, DeviceState, Repository, UnitOfWork};

#[derive(Debug, Clone, Default)]
pub struct CreateDeviceCommand {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub state: Option<DeviceState>,
}

/// Absent fields are left as they are.
#[derive(Debug, Clone)]
pub struct UpdateDeviceCommand {
    pub id: Uuid,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub state: Option<DeviceState>,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteDeviceCommand {
    pub id: Uuid,
}

/// Runs each mutating use case as a single unit of work.
pub struct DevicesCommandHandler {
    repository: Arc<dyn Repository<Device>>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl DevicesCommandHandler {
    pub fn new(repository: Arc<dyn Repository<Device>>, unit_of_work: Arc<dyn UnitOfWork>) -> Self {
        Self {
            repository,
            unit_of_work,
        }
    }

    pub async fn create(&self, command: CreateDeviceCommand) -> AppResult<Uuid> {
        let device = Device::create(command.name, command.brand, command.state);
        let id = device.id();
        let state = device.state();

        self.repository.add(device).await?;
        self.unit_of_work.save().await?;

        info!(device_id = %id, %state, "Device created");
        Ok(id)
    }

    /// Applies rename, rebrand, then state change. The in-use guard sees the
    /// state as loaded, so a request may rename and set `in-use` together.
    pub async fn update(&self, command: UpdateDeviceCommand) -> AppResult<()> {
        let mut device = self.repository.get_by_id(command.id).await?;

        let renamed = command.name.is_some();
        let rebranded = command.brand.is_some();
        let new_state = command.state;

        if let Some(name) = command.name {
            device.rename(Some(name))?;
        }
        if let Some(brand) = command.brand {
            device.rebrand(Some(brand))?;
        }
        if let Some(state) = new_state {
            device.change_state(state);
        }

        self.repository.update(device).await?;
        self.unit_of_work.save().await?;

        info!(
            device_id = %command.id,
            renamed,
            rebranded,
            state = ?new_state,
            "Device updated"
        );
        Ok(())
    }

    pub async fn delete(&self, command: DeleteDeviceCommand) -> AppResult<()> {
        let device = self.repository.get_by_id(command.id).await?;
        device.ensure_can_be_deleted()?;

        self.repository.remove(device).await?;
        self.unit_of_work.save().await?;

        info!(device_id = %command.id, "Device deleted");
        Ok(())
    }
}
