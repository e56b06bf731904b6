use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dtos::propertydtos::{EngagementDto, PropertyCardDto, PropertyQueryDto},
    error::HttpError,
    filter::PropertyFilter,
    models::propertymodel::Counter,
    AppState,
};

pub fn properties_handler() -> Router {
    Router::new()
        .route("/", get(get_properties))
        .route("/featured", get(get_featured_properties))
        .route("/:id", get(get_property))
        .route("/:id/view", post(record_view))
        .route("/:id/call", post(record_call))
        .route("/:id/whatsapp", post(record_whatsapp))
}

pub async fn get_properties(
    Query(query): Query<PropertyQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> impl IntoResponse {
    let filter = PropertyFilter::from(query);
    let properties = app_state.listing_service.browse(&filter).await;
    let cards = PropertyCardDto::from_properties(properties);

    Json(json!({
        "status": "success",
        "results": cards.len(),
        "data": {
            "properties": cards
        }
    }))
}

pub async fn get_featured_properties(
    Extension(app_state): Extension<Arc<AppState>>,
) -> impl IntoResponse {
    let cards = PropertyCardDto::from_properties(app_state.listing_service.featured().await);

    Json(json!({
        "status": "success",
        "results": cards.len(),
        "data": {
            "properties": cards
        }
    }))
}

pub async fn get_property(
    Path(property_uuid): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let detail = app_state
        .listing_service
        .detail(property_uuid)
        .await
        .ok_or_else(|| HttpError::not_found("Property not found"))?;

    Ok(Json(json!({
        "status": "success",
        "data": {
            "property": detail
        }
    })))
}

async fn track(
    app_state: Arc<AppState>,
    property_id: i64,
    counter: Counter,
    body: Option<Json<EngagementDto>>,
) -> impl IntoResponse {
    let title = body.and_then(|Json(dto)| dto.property_title);
    app_state.engagement_service.track(property_id, counter, title);

    (StatusCode::ACCEPTED, Json(json!({ "status": "accepted" })))
}

pub async fn record_view(
    Path(property_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    body: Option<Json<EngagementDto>>,
) -> impl IntoResponse {
    track(app_state, property_id, Counter::View, body).await
}

pub async fn record_call(
    Path(property_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    body: Option<Json<EngagementDto>>,
) -> impl IntoResponse {
    track(app_state, property_id, Counter::Call, body).await
}

pub async fn record_whatsapp(
    Path(property_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    body: Option<Json<EngagementDto>>,
) -> impl IntoResponse {
    track(app_state, property_id, Counter::Whatsapp, body).await
}
