use crate::core::error::AppError;
use crate::features::auth::JwtValidator;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Basic auth guard for the API docs, `credentials` in "username:password" form
pub async fn basic_auth_middleware(
    State(credentials): State<Arc<String>>,
    req: Request,
    next: Next,
) -> Response {
    let authorized = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Basic "))
        .and_then(|encoded| BASE64_STANDARD.decode(encoded).ok())
        .and_then(|decoded| String::from_utf8(decoded).ok())
        .is_some_and(|creds| creds == *credentials);

    if authorized {
        return next.run(req).await;
    }

    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")],
        "Unauthorized",
    )
        .into_response()
}

fn bearer_token(req: &Request) -> Result<Option<&str>, AppError> {
    let Some(auth_header) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return Ok(None);
    };

    auth_header
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".to_string()))
}

/// Reject requests without a valid bearer token
pub async fn auth_middleware(
    State(validator): State<Arc<JwtValidator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req)?
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let user = validator.validate_token(token)?;
    tracing::debug!("Authenticated request for {}", user.sub);

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Authenticate when a bearer token is present, pass through otherwise
pub async fn optional_auth_middleware(
    State(validator): State<Arc<JwtValidator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = bearer_token(&req)? {
        let user = validator.validate_token(token)?;
        req.extensions_mut().insert(user);
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::shared::test_helpers::TEST_USER_ID;
    use axum::{middleware::from_fn_with_state, routing::get, Router};
    use axum_test::TestServer;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use std::time::Duration;

    const SECRET: &str = "middleware-secret";

    fn validator() -> Arc<JwtValidator> {
        Arc::new(JwtValidator::new(&AuthConfig {
            jwt_secret: SECRET.to_string(),
            issuer: None,
            audience: None,
            jwt_leeway: Duration::from_secs(0),
        }))
    }

    fn token() -> String {
        let exp = chrono::Utc::now().timestamp() + 3600;
        encode(
            &Header::default(),
            &json!({ "sub": TEST_USER_ID.to_string(), "exp": exp }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    async fn whoami(user: Option<AuthenticatedUser>) -> String {
        user.map(|u| u.user_id.to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn server(required: bool) -> TestServer {
        let router = Router::new().route("/whoami", get(whoami));
        let router = if required {
            router.route_layer(from_fn_with_state(validator(), auth_middleware))
        } else {
            router.route_layer(from_fn_with_state(validator(), optional_auth_middleware))
        };
        TestServer::new(router).unwrap()
    }

    #[tokio::test]
    async fn test_required_auth_rejects_missing_token() {
        server(true)
            .get("/whoami")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_required_auth_accepts_valid_token() {
        let response = server(true)
            .get("/whoami")
            .authorization_bearer(token())
            .await;

        response.assert_status_ok();
        response.assert_text(TEST_USER_ID.to_string());
    }

    #[tokio::test]
    async fn test_optional_auth_passes_anonymous_requests() {
        server(false)
            .get("/whoami")
            .await
            .assert_text("anonymous");
    }

    #[tokio::test]
    async fn test_optional_auth_rejects_bad_token() {
        server(false)
            .get("/whoami")
            .authorization_bearer("not-a-jwt")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
