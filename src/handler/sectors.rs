use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dtos::sectordtos::{CreateSectorDto, SectorQueryDto},
    error::HttpError,
    AppState,
};

pub fn sectors_handler() -> Router {
    Router::new()
        .route("/", get(get_sectors))
        .route("/footer", get(get_footer_sectors))
}

pub fn admin_sectors_handler() -> Router {
    Router::new()
        .route("/", post(create_sector))
        .route("/:id", delete(delete_sector))
}

pub async fn get_sectors(
    Query(query): Query<SectorQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let sectors = app_state.listing_service.sectors(query.limit).await;

    Ok(Json(json!({
        "status": "success",
        "results": sectors.len(),
        "data": {
            "sectors": sectors
        }
    })))
}

pub async fn get_footer_sectors(
    Extension(app_state): Extension<Arc<AppState>>,
) -> impl IntoResponse {
    let sectors = app_state.listing_service.footer_sectors().await;

    Json(json!({
        "status": "success",
        "data": {
            "sectors": sectors
        }
    }))
}

pub async fn create_sector(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateSectorDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let sector = app_state.directory_service.create_sector(body).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": {
                "sector": sector
            }
        })),
    ))
}

pub async fn delete_sector(
    Path(sector_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.directory_service.delete_sector(sector_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Sector deleted"
    })))
}
