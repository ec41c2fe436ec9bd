pub mod commands;
pub mod error;
pub mod queries;

pub use commands::{CreateDeviceCommand, DeleteDeviceCommand, DevicesCommandHandler, UpdateDeviceCommand};
pub use error::{AppError, AppResult};
pub use queries::{DevicesQueryHandler, GetDeviceQuery, GetDevicesQuery};
