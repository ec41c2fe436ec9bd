use anyhow::Context;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{models::DeviceRow, queries};
use crate::domain::ports::RepositoryResult;
use crate::domain::{Device, DeviceFilter, DeviceQueries, Repository, RepositoryError, UnitOfWork};

#[derive(Debug)]
enum PendingChange {
    Insert(Device),
    Update(Device),
    Delete(Uuid),
}

/// Request-scoped repository and unit of work over SQLite.
///
/// Reads go straight to the pool. Writes are queued and only reach the
/// database inside the single transaction opened by [`UnitOfWork::save`].
/// If the save future is dropped midway the transaction rolls back.
pub struct SqliteUnitOfWork {
    pool: SqlitePool,
    pending: Mutex<Vec<PendingChange>>,
}

impl SqliteUnitOfWork {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteUnitOfWork {
            pool,
            pending: Mutex::new(Vec::new()),
        }
    }

    async fn stage(&self, change: PendingChange) {
        self.pending.lock().await.push(change);
    }
}

#[async_trait]
impl Repository<Device> for SqliteUnitOfWork {
    async fn add(&self, entity: Device) -> RepositoryResult<()> {
        self.stage(PendingChange::Insert(entity)).await;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Device> {
        let row = queries::get_device(&self.pool, &id.to_string())
            .await?
            .ok_or(RepositoryError::NotFound(id))?;
        Ok(Device::try_from(row)?)
    }

    async fn update(&self, entity: Device) -> RepositoryResult<()> {
        self.stage(PendingChange::Update(entity)).await;
        Ok(())
    }

    // Hard delete.
    async fn remove(&self, entity: Device) -> RepositoryResult<()> {
        self.stage(PendingChange::Delete(entity.id())).await;
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    async fn save(&self) -> RepositoryResult<()> {
        let changes = std::mem::take(&mut *self.pending.lock().await);
        if changes.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to open transaction")?;

        for change in &changes {
            match change {
                PendingChange::Insert(device) => {
                    queries::insert_device(&mut *tx, &DeviceRow::from(device)).await?;
                }
                PendingChange::Update(device) => {
                    let touched = queries::update_device(&mut *tx, &DeviceRow::from(device)).await?;
                    if touched == 0 {
                        return Err(RepositoryError::NotFound(device.id()));
                    }
                }
                PendingChange::Delete(id) => {
                    let touched = queries::delete_device(&mut *tx, &id.to_string()).await?;
                    if touched == 0 {
                        return Err(RepositoryError::NotFound(*id));
                    }
                }
            }
        }

        tx.commit().await.context("Failed to commit transaction")?;
        tracing::debug!("Committed {} change(s)", changes.len());
        Ok(())
    }
}

/// Read side for device listings.
#[derive(Clone)]
pub struct SqliteDeviceQueries {
    pool: SqlitePool,
}

impl SqliteDeviceQueries {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteDeviceQueries { pool }
    }
}

#[async_trait]
impl DeviceQueries for SqliteDeviceQueries {
    async fn list(&self, filter: DeviceFilter) -> RepositoryResult<Vec<Device>> {
        let rows = queries::list_devices(&self.pool, &filter).await?;
        let devices = rows
            .into_iter()
            .map(Device::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(devices)
    }
}
