use super::jwt::{JwtAuth, TokenType};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// `Authorization: Bearer <token>` first, then the `access_token` cookie.
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.trim().to_string()))
        .or_else(|| {
            headers
                .get("cookie")
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        cookie
                            .trim()
                            .strip_prefix("access_token=")
                            .map(|s| s.to_string())
                    })
                })
        })
}

/// Rejects requests without a live access token and stores its [`JwtClaims`](super::JwtClaims)
/// in the request extensions for [`CurrentUser`](crate::CurrentUser).
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token_from_request(&headers).ok_or_else(|| {
        tracing::debug!("No JWT found in Authorization header or cookie");
        AppError::Unauthorized("No token provided".to_string())
    })?;

    let claims = auth
        .authenticate(&token, TokenType::Access)
        .await
        .inspect_err(|e| tracing::debug!("JWT rejected: {}", e))?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Attaches claims when a live access token is present and lets anonymous requests through.
pub async fn optional_jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token_from_request(&headers) {
        if let Ok(claims) = auth.authenticate(&token, TokenType::Access).await {
            request.extensions_mut().insert(claims);
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{InMemoryTokenStore, JwtConfig};
    use crate::extractors::CurrentUser;
    use axum::{Router, body::Body, http::StatusCode, middleware, routing::get};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn auth() -> JwtAuth {
        let config = JwtConfig::new("middleware-test-secret-with-enough-chars").unwrap();
        JwtAuth::new(&config, Arc::new(InMemoryTokenStore::new()))
    }

    async fn whoami(user: Option<CurrentUser>) -> String {
        user.map(|u| u.email).unwrap_or_else(|| "anonymous".to_string())
    }

    fn protected(auth: JwtAuth) -> Router {
        Router::new()
            .route("/me", get(whoami))
            .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware))
    }

    fn lenient(auth: JwtAuth) -> Router {
        Router::new()
            .route("/me", get(whoami))
            .route_layer(middleware::from_fn_with_state(
                auth,
                optional_jwt_auth_middleware,
            ))
    }

    fn request(header: Option<(&str, String)>) -> Request {
        let mut builder = Request::builder().uri("/me");
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn user() -> CurrentUser {
        CurrentUser::new(Uuid::now_v7(), "kamola@example.com", "Kamola", "user")
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = protected(auth()).oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bearer_access_token_is_accepted() {
        let auth = auth();
        let pair = auth.issue_pair(&user()).await.unwrap();
        let response = protected(auth)
            .oneshot(request(Some((
                "authorization",
                format!("Bearer {}", pair.access),
            ))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cookie_token_is_accepted() {
        let auth = auth();
        let pair = auth.issue_pair(&user()).await.unwrap();
        let response = protected(auth)
            .oneshot(request(Some((
                "cookie",
                format!("theme=dark; access_token={}", pair.access),
            ))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_refresh_token_is_rejected() {
        let auth = auth();
        let pair = auth.issue_pair(&user()).await.unwrap();
        let response = protected(auth)
            .oneshot(request(Some((
                "authorization",
                format!("Bearer {}", pair.refresh),
            ))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_revoked_access_token_is_rejected() {
        let auth = auth();
        let pair = auth.issue_pair(&user()).await.unwrap();
        let claims = auth.verify(&pair.access).unwrap();
        auth.revoke(&claims).await.unwrap();

        let response = protected(auth)
            .oneshot(request(Some((
                "authorization",
                format!("Bearer {}", pair.access),
            ))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_optional_middleware_allows_anonymous() {
        let response = lenient(auth())
            .oneshot(request(Some(("authorization", "Bearer garbage".into()))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_extract_prefers_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer from-header".parse().unwrap());
        headers.insert("cookie", "access_token=from-cookie".parse().unwrap());
        assert_eq!(
            extract_token_from_request(&headers).as_deref(),
            Some("from-header")
        );
    }
}
