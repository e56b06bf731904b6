use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde_json::json;
use validator::Validate;

use crate::{dtos::agentdtos::CreateAgentDto, error::HttpError, AppState};

pub fn agents_handler() -> Router {
    Router::new()
        .route("/", get(get_agents).post(create_agent))
        .route("/:id", delete(delete_agent))
}

pub async fn get_agents(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let agents = app_state.directory_service.agents().await?;

    Ok(Json(json!({
        "status": "success",
        "results": agents.len(),
        "data": {
            "agents": agents
        }
    })))
}

pub async fn create_agent(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateAgentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let agent = app_state.directory_service.create_agent(body).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": {
                "agent": agent
            }
        })),
    ))
}

pub async fn delete_agent(
    Path(agent_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.directory_service.delete_agent(agent_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Agent deleted"
    })))
}
