use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Device;

#[derive(Debug, Deserialize)]
pub struct CreateDeviceRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDeviceRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDeviceResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDevicesParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub brand: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub state: String,
    pub creation_time: DateTime<Utc>,
}

impl From<&Device> for DeviceSummary {
    fn from(d: &Device) -> Self {
        DeviceSummary {
            id: d.id(),
            name: d.name().map(str::to_string),
            brand: d.brand().map(str::to_string),
            state: d.state().as_str().to_string(),
            creation_time: d.creation_time(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub total_count: usize,
}
