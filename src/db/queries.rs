use anyhow::Result;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use super::models::DeviceRow;
use crate::domain::DeviceFilter;

const DEVICE_COLUMNS: &str = "id, name, brand, state, creation_time";

// ─── Device queries ──────────────────────────────────────────────────────────

pub async fn get_device<'e, E>(executor: E, id: &str) -> Result<Option<DeviceRow>>
where
    E: SqliteExecutor<'e>,
{
    let device = sqlx::query_as::<_, DeviceRow>(
        "SELECT id, name, brand, state, creation_time FROM devices WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(device)
}

pub async fn list_devices<'e, E>(executor: E, filter: &DeviceFilter) -> Result<Vec<DeviceRow>>
where
    E: SqliteExecutor<'e>,
{
    let mut query = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {DEVICE_COLUMNS} FROM devices WHERE 1 = 1"
    ));

    if let Some(brand) = &filter.brand {
        query.push(" AND brand = ").push_bind(brand.clone());
    }
    if let Some(state) = filter.state {
        query.push(" AND state = ").push_bind(state.code());
    }

    query
        .push(" ORDER BY creation_time DESC LIMIT ")
        .push_bind(filter.page_size)
        .push(" OFFSET ")
        .push_bind(filter.skip());

    let devices = query
        .build_query_as::<DeviceRow>()
        .fetch_all(executor)
        .await?;
    Ok(devices)
}

pub async fn insert_device<'e, E>(executor: E, d: &DeviceRow) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO devices (id, name, brand, state, creation_time)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&d.id)
    .bind(&d.name)
    .bind(&d.brand)
    .bind(d.state)
    .bind(d.creation_time_text())
    .execute(executor)
    .await?;
    Ok(())
}

/// Returns the number of rows touched; `creation_time` is never rewritten.
pub async fn update_device<'e, E>(executor: E, d: &DeviceRow) -> Result<u64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("UPDATE devices SET name = ?, brand = ?, state = ? WHERE id = ?")
        .bind(&d.name)
        .bind(&d.brand)
        .bind(d.state)
        .bind(&d.id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_device<'e, E>(executor: E, id: &str) -> Result<u64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM devices WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
