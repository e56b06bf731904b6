use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    db::admindb::AdminExt,
    dtos::authdtos::{AdminLoginResponseDto, LoginAdminDto, Response},
    error::{ErrorMessage, HttpError},
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

fn set_cookie(response: &mut axum::response::Response, cookie: Cookie<'_>) -> Result<(), HttpError> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginAdminDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .db_client
        .get_admin(None, Some(&body.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let admin = result.ok_or(HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matched = password::compare(&body.password, &admin.password)
        .map_err(|_| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()));
    }

    let token = token::create_token(
        &admin.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(time::Duration::minutes(app_state.env.jwt_maxage))
        .http_only(true)
        .build();

    let mut response = Json(AdminLoginResponseDto {
        status: "success".to_string(),
        token,
    })
    .into_response();
    set_cookie(&mut response, cookie)?;

    tracing::info!("Admin {} logged in", admin.email);
    Ok(response)
}

pub async fn logout() -> Result<impl IntoResponse, HttpError> {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .http_only(true)
        .build();

    let mut response = Json(Response {
        status: "success",
        message: "Logged out".to_string(),
    })
    .into_response();
    set_cookie(&mut response, cookie)?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    use crate::tests::test_state;

    #[tokio::test]
    async fn logout_expires_the_cookie() {
        let response = auth_handler()
            .layer(Extension(test_state()))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn invalid_login_body_is_a_bad_request() {
        let response = auth_handler()
            .layer(Extension(test_state()))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"nope","password":"x"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
