pub mod device;
pub mod ports;
pub mod state;

pub use device::{Device, DeviceInUse, GuardedOperation};
pub use ports::{DeviceFilter, DeviceQueries, Repository, RepositoryError, UnitOfWork};
pub use state::{DeviceState, InvalidDeviceState};
