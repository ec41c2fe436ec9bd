use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::error::AppResult;
use crate::domain::{Device, DeviceFilter, DeviceQueries, DeviceState, Repository};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 50;

#[derive(Debug, Clone, Copy)]
pub struct GetDeviceQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone)]
pub struct GetDevicesQuery {
    pub page: i64,
    pub page_size: i64,
    pub brand: Option<String>,
    pub state: Option<DeviceState>,
}

impl Default for GetDevicesQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            brand: None,
            state: None,
        }
    }
}

/// Read-only projections; no invariants are checked here.
pub struct DevicesQueryHandler {
    repository: Arc<dyn Repository<Device>>,
    queries: Arc<dyn DeviceQueries>,
}

impl DevicesQueryHandler {
    pub fn new(repository: Arc<dyn Repository<Device>>, queries: Arc<dyn DeviceQueries>) -> Self {
        Self {
            repository,
            queries,
        }
    }

    pub async fn get(&self, query: GetDeviceQuery) -> AppResult<Device> {
        debug!(device_id = %query.id, "Getting device");
        Ok(self.repository.get_by_id(query.id).await?)
    }

    pub async fn list(&self, query: GetDevicesQuery) -> AppResult<Vec<Device>> {
        debug!(
            page = query.page,
            page_size = query.page_size,
            brand = ?query.brand,
            state = ?query.state,
            "Listing devices"
        );

        let devices = self
            .queries
            .list(DeviceFilter {
                page: query.page,
                page_size: query.page_size,
                brand: query.brand,
                state: query.state,
            })
            .await?;

        debug!(count = devices.len(), "Listed devices");
        Ok(devices)
    }
}
