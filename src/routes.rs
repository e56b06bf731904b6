// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    handler::{
        admin::admin_handler,
        agents::agents_handler,
        auth::auth_handler,
        properties::properties_handler,
        sectors::{admin_sectors_handler, sectors_handler},
    },
    middleware::{auth, session_gate},
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let admin_routes = admin_handler()
        .nest("/agents", agents_handler())
        .nest("/sectors", admin_sectors_handler())
        .layer(middleware::from_fn(auth));

    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/properties", properties_handler())
        .nest("/sectors", sectors_handler())
        .nest("/admin", admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state.clone()));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route);

    // Front-end bundle; unknown paths fall back to index.html for client routing
    if let Some(static_dir) = &app_state.env.static_dir {
        let index = format!("{}/index.html", static_dir.trim_end_matches('/'));
        router = router.fallback_service(ServeDir::new(static_dir).not_found_service(ServeFile::new(index)));
    }

    router
        .layer(middleware::from_fn(session_gate))
        .layer(Extension(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::tests::test_state;

    async fn send(request: Request<Body>) -> axum::response::Response {
        create_router(test_state()).oneshot(request).await.unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        assert_eq!(send(get("/health")).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_api_requires_a_token() {
        for uri in ["/api/admin/dashboard", "/api/admin/properties", "/api/admin/agents"] {
            assert_eq!(send(get(uri)).await.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn admin_pages_are_gated() {
        let response = send(get("/admin/properties")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin/login");
    }

    #[tokio::test]
    async fn engagement_is_accepted_immediately() {
        for uri in ["/api/properties/5/view", "/api/properties/5/call", "/api/properties/5/whatsapp"] {
            assert_eq!(send(post(uri)).await.status(), StatusCode::ACCEPTED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn malformed_ids_are_rejected() {
        assert_eq!(send(post("/api/properties/abc/call")).await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(send(get("/api/properties/not-a-uuid")).await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn public_reads_degrade_to_empty_lists() {
        let response = send(get("/api/properties?listingType=rent&sector=all")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["results"], 0);
        assert_eq!(value["data"]["properties"], serde_json::json!([]));
    }
}
