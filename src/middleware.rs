use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    db::admindb::AdminExt,
    error::{ErrorMessage, HttpError},
    models::adminmodel::Admin,
    utils::token,
    AppState,
};

pub const ADMIN_HOME_PATH: &str = "/admin";
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

#[derive(Debug, Clone)]
pub struct AdminSession {
    pub admin: Admin,
}

/// Resolves a token to an admin that still exists.
async fn session_admin(app_state: &AppState, token: &str) -> Result<Admin, HttpError> {
    let admin_id = token::decode_token(token, app_state.env.jwt_secret.as_bytes())?
        .parse::<i64>()
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    app_state
        .db_client
        .get_admin(Some(admin_id), None)
        .await
        .map_err(|_| HttpError::unauthorized(ErrorMessage::AdminNoLongerExist.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::AdminNoLongerExist.to_string()))
}

pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer "))
                .map(str::to_owned)
        })
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    let admin = session_admin(&app_state, &token).await?;

    req.extensions_mut().insert(AdminSession { admin });

    Ok(next.run(req).await)
}

/// Where a page request must be sent instead, if anywhere.
pub fn gate_decision(path: &str, authenticated: bool) -> Option<&'static str> {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    let is_login = path == ADMIN_LOGIN_PATH;
    let under_admin = path == ADMIN_HOME_PATH || path.starts_with("/admin/");

    if is_login && authenticated {
        Some(ADMIN_HOME_PATH)
    } else if under_admin && !is_login && !authenticated {
        Some(ADMIN_LOGIN_PATH)
    } else {
        None
    }
}

/// Redirects admin page requests based on the session cookie. Paths outside
/// `/admin` pass straight through without touching the store.
pub async fn session_gate(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if gate_decision(&path, false).is_none() && gate_decision(&path, true).is_none() {
        return next.run(req).await;
    }

    let authenticated = match cookie_jar.get("token") {
        Some(cookie) => session_admin(&app_state, cookie.value()).await.is_ok(),
        None => false,
    };

    match gate_decision(&path, authenticated) {
        Some(target) => {
            tracing::debug!("Session gate: {} -> {}", path, target);
            Redirect::to(target).into_response()
        }
        None => next.run(req).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    use crate::tests::test_state;

    #[test]
    fn unauthenticated_admin_pages_go_to_login() {
        assert_eq!(gate_decision("/admin", false), Some(ADMIN_LOGIN_PATH));
        assert_eq!(gate_decision("/admin/properties/new", false), Some(ADMIN_LOGIN_PATH));
        assert_eq!(gate_decision("/admin/login", false), None);
    }

    #[test]
    fn authenticated_login_page_goes_home() {
        assert_eq!(gate_decision("/admin/login", true), Some(ADMIN_HOME_PATH));
        assert_eq!(gate_decision("/admin/login/", true), Some(ADMIN_HOME_PATH));
        assert_eq!(gate_decision("/admin/agents", true), None);
    }

    #[test]
    fn public_pages_pass_through() {
        for path in ["/", "/properties", "/administrator", "/api/admin/dashboard"] {
            assert_eq!(gate_decision(path, false), None);
            assert_eq!(gate_decision(path, true), None);
        }
    }

    fn gated_router() -> Router {
        Router::new()
            .route("/", get(|| async { "home" }))
            .route("/admin", get(|| async { "dashboard" }))
            .route("/admin/login", get(|| async { "login" }))
            .layer(middleware::from_fn(session_gate))
            .layer(Extension(test_state()))
    }

    async fn get_path(router: Router, uri: &str, cookie: Option<&str>) -> axum::response::Response {
        let mut request = HttpRequest::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn gate_redirects_anonymous_admin_requests() {
        let response = get_path(gated_router(), "/admin", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], ADMIN_LOGIN_PATH);

        let response = get_path(gated_router(), "/admin/login", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get_path(gated_router(), "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn forged_cookie_is_not_a_session() {
        let response = get_path(gated_router(), "/admin", Some("token=not-a-jwt")).await;
        assert_eq!(response.headers()[header::LOCATION], ADMIN_LOGIN_PATH);
    }

    #[tokio::test]
    async fn api_auth_rejects_missing_and_invalid_tokens() {
        let router = || {
            Router::new()
                .route("/protected", get(|| async { "ok" }))
                .layer(middleware::from_fn(auth))
                .layer(Extension(test_state()))
        };

        let response = get_path(router(), "/protected", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = router()
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header(header::AUTHORIZATION, "Bearer garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
