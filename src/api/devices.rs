use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use super::dto::{
    CreateDeviceRequest, CreateDeviceResponse, DeviceSummary, ListDevicesParams, PagedResponse,
    UpdateDeviceRequest,
};
use super::error::ApiError;
use crate::{
    application::{
        queries::DEFAULT_PAGE,
        CreateDeviceCommand, DeleteDeviceCommand, DevicesCommandHandler, DevicesQueryHandler,
        GetDeviceQuery, GetDevicesQuery, UpdateDeviceCommand,
    },
    db::{SqliteDeviceQueries, SqliteUnitOfWork},
    domain::DeviceState,
    AppState,
};

pub const PREFIX: &str = "/devices";

/// One unit of work per request, shared by the repository and commit ports.
fn command_handler(state: &AppState) -> DevicesCommandHandler {
    let uow = Arc::new(SqliteUnitOfWork::new(state.pool.clone()));
    DevicesCommandHandler::new(uow.clone(), uow)
}

fn query_handler(state: &AppState) -> DevicesQueryHandler {
    DevicesQueryHandler::new(
        Arc::new(SqliteUnitOfWork::new(state.pool.clone())),
        Arc::new(SqliteDeviceQueries::new(state.pool.clone())),
    )
}

fn parse_state(label: Option<&str>) -> Result<Option<DeviceState>, ApiError> {
    Ok(label.map(DeviceState::from_label).transpose()?)
}

/// POST /devices
pub async fn create_device(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDeviceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let device_state = parse_state(req.state.as_deref())?;

    let id = command_handler(&state)
        .create(CreateDeviceCommand {
            name: req.name,
            brand: req.brand,
            state: device_state,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("{}/{}", PREFIX, id))],
        Json(CreateDeviceResponse { id }),
    ))
}

/// PUT /devices/:id
pub async fn update_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDeviceRequest>,
) -> Result<StatusCode, ApiError> {
    let device_state = parse_state(req.state.as_deref())?;

    command_handler(&state)
        .update(UpdateDeviceCommand {
            id,
            name: req.name,
            brand: req.brand,
            state: device_state,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /devices/:id
pub async fn get_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeviceSummary>, ApiError> {
    let device = query_handler(&state).get(GetDeviceQuery { id }).await?;
    Ok(Json(DeviceSummary::from(&device)))
}

/// GET /devices?page=&pageSize=&brand=&state=
pub async fn list_devices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListDevicesParams>,
) -> Result<Json<PagedResponse<DeviceSummary>>, ApiError> {
    let device_state = parse_state(params.state.as_deref())?;

    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let page_size = params.page_size.unwrap_or(state.default_page_size);
    if page < 1 || page_size < 1 {
        return Err(ApiError::InvalidPaging(
            "page and pageSize must be positive integers".to_string(),
        ));
    }

    let devices = query_handler(&state)
        .list(GetDevicesQuery {
            page,
            page_size,
            brand: params.brand,
            state: device_state,
        })
        .await?;

    let items: Vec<DeviceSummary> = devices.iter().map(DeviceSummary::from).collect();
    Ok(Json(PagedResponse {
        total_count: items.len(),
        items,
    }))
}

/// DELETE /devices/:id
pub async fn delete_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    command_handler(&state)
        .delete(DeleteDeviceCommand { id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
