use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::device::Device;
use super::state::DeviceState;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("No entity with id {0}")]
    NotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Entity storage, scoped to one unit of work.
/// Writes are staged; nothing is persisted until [`UnitOfWork::save`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository<T: Send + Sync + 'static>: Send + Sync {
    async fn add(&self, entity: T) -> RepositoryResult<()>;

    /// Fails with [`RepositoryError::NotFound`] when no entity matches.
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<T>;

    /// Stage the current value of a loaded entity.
    async fn update(&self, entity: T) -> RepositoryResult<()>;

    async fn remove(&self, entity: T) -> RepositoryResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Commit every staged change atomically.
    async fn save(&self) -> RepositoryResult<()>;
}

/// Equality filters and a one-indexed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFilter {
    pub page: i64,
    pub page_size: i64,
    pub brand: Option<String>,
    pub state: Option<DeviceState>,
}

impl DeviceFilter {
    pub fn skip(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceQueries: Send + Sync {
    /// Matching devices, newest first.
    async fn list(&self, filter: DeviceFilter) -> RepositoryResult<Vec<Device>>;
}
