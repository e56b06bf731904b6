use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dtos::{
        authdtos::FilterAdminDto,
        propertydtos::{AdminPropertyQueryDto, FeaturedDto, PropertyFormDto},
    },
    error::HttpError,
    middleware::AdminSession,
    models::propertymodel::{PropertyCategory, PropertyType},
    AppState,
};

pub fn admin_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route("/dashboard", get(get_dashboard))
        .route("/property-types", get(get_property_types))
        .route("/properties", get(list_properties).post(create_property))
        .route(
            "/properties/:id",
            get(get_property).put(update_property).delete(delete_property),
        )
        .route("/properties/:id/featured", put(set_featured))
}

pub async fn get_me(Extension(session): Extension<AdminSession>) -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "data": {
            "admin": FilterAdminDto::filter_admin(&session.admin)
        }
    }))
}

// Type options per category for the listing form.
pub async fn get_property_types() -> impl IntoResponse {
    let categories: Vec<_> = [
        PropertyCategory::Residential,
        PropertyCategory::Commercial,
        PropertyCategory::Plot,
    ]
    .into_iter()
    .map(|category| {
        let types: Vec<_> = PropertyType::for_category(category)
            .into_iter()
            .map(|t| json!({ "value": t.as_str(), "label": t.label() }))
            .collect();
        json!({ "category": category.as_str(), "types": types })
    })
    .collect();

    Json(json!({
        "status": "success",
        "data": {
            "categories": categories
        }
    }))
}

pub async fn get_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let dashboard = app_state.property_service.dashboard().await?;

    Ok(Json(json!({
        "status": "success",
        "data": dashboard
    })))
}

pub async fn list_properties(
    Query(query): Query<AdminPropertyQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let properties = app_state.property_service.list(query.search).await?;

    Ok(Json(json!({
        "status": "success",
        "results": properties.len(),
        "data": {
            "properties": properties
        }
    })))
}

pub async fn get_property(
    Path(property_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state.property_service.get(property_id).await?;

    Ok(Json(json!({
        "status": "success",
        "data": {
            "property": property
        }
    })))
}

pub async fn create_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<AdminSession>,
    Json(body): Json<PropertyFormDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let property = app_state.property_service.create(body).await?;
    tracing::info!("Admin {} created property {}", session.admin.email, property.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": {
                "property": property
            }
        })),
    ))
}

pub async fn update_property(
    Path(property_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<PropertyFormDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let property = app_state.property_service.update(property_id, body).await?;

    Ok(Json(json!({
        "status": "success",
        "data": {
            "property": property
        }
    })))
}

pub async fn delete_property(
    Path(property_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.property_service.delete(property_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Property deleted"
    })))
}

pub async fn set_featured(
    Path(property_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<FeaturedDto>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state
        .property_service
        .set_featured(property_id, body.is_featured)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "data": {
            "property": property
        }
    })))
}
