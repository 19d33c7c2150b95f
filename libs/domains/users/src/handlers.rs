use axum::{
    Extension, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, CurrentUser, JwtClaims, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use domain_catalog::ProductSummary;
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::error::{UserError, UserResult};
use crate::models::{
    AccessResponse, AuthResponse, MessageResponse, ProfileResponse, RefreshRequest,
    SigninRequest, SignupRequest, SignupResponse, ToggleFavoriteRequest, ToggleFavoriteResponse,
    UpdateProfile, UserResponse, UserRole, VerifyOtpRequest,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the users endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        signup,
        signin,
        verify_otp,
        refresh_token,
        logout,
        get_profile,
        update_profile,
        patch_profile,
        toggle_favorite,
        list_favorites,
        list_specialists,
    ),
    components(
        schemas(
            UserRole, UserResponse, ProfileResponse, SignupRequest, SignupResponse,
            SigninRequest, VerifyOtpRequest, RefreshRequest, AuthResponse, AccessResponse,
            MessageResponse, UpdateProfile, ToggleFavoriteRequest, ToggleFavoriteResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::user::Model::TAG, description = "Accounts, OTP sign-in and favorites")
    )
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<UserService<R>>>;

/// Account routes. Sign-up, sign-in and token refresh are public.
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let auth = service.auth().clone();
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/verify-otp", post(verify_otp))
        .route("/token/refresh", post(refresh_token))
        .route("/specialists", get(list_specialists));

    let protected = Router::new()
        .route("/logout", post(logout))
        .route(
            "/profile",
            get(get_profile).put(update_profile).patch(patch_profile),
        )
        .route("/toggle-favorite", post(toggle_favorite))
        .route("/favorites", get(list_favorites))
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    public.merge(protected).with_state(shared_service)
}

/// Create an account and mail a verification code
#[utoipa::path(
    post,
    path = "/signup",
    tag = entity::user::Model::TAG,
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created, OTP sent", body = SignupResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn signup<R: UserRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> UserResult<impl IntoResponse> {
    let user = service.signup(input).await?;

    AuditEvent::new(
        Some(user.id),
        "user.signup",
        Some(format!("user:{}", user.id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .with_details(json!({ "role": user.role.to_string() }))
    .log();

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user,
            message: "User created. OTP sent to email.".to_string(),
        }),
    ))
}

/// Check the password and mail a sign-in code
#[utoipa::path(
    post,
    path = "/signin",
    tag = entity::user::Model::TAG,
    request_body = SigninRequest,
    responses(
        (status = 200, description = "OTP sent", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn signin<R: UserRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<SigninRequest>,
) -> UserResult<Json<MessageResponse>> {
    let email = input.email.clone();
    match service.signin(input).await {
        Ok(user_id) => {
            AuditEvent::new(Some(user_id), "user.signin", None, AuditOutcome::Success)
                .with_request(&headers)
                .log();
            Ok(Json(MessageResponse::new("OTP sent to your email")))
        }
        Err(e @ UserError::InvalidCredentials) => {
            AuditEvent::new(None, "user.signin", None, AuditOutcome::Denied)
                .with_request(&headers)
                .with_details(json!({ "email": email }))
                .log();
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// Exchange the emailed code for a token pair
#[utoipa::path(
    post,
    path = "/verify-otp",
    tag = entity::user::Model::TAG,
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn verify_otp<R: UserRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<VerifyOtpRequest>,
) -> UserResult<Json<AuthResponse>> {
    let email = input.email.clone();
    let result = service.verify_otp(input).await;

    let (user_id, outcome) = match &result {
        Ok(response) => (Some(response.user.id), AuditOutcome::Success),
        Err(_) => (None, AuditOutcome::Failure),
    };
    AuditEvent::new(user_id, "user.verify_otp", None, outcome)
        .with_request(&headers)
        .with_details(json!({ "email": email }))
        .log();

    Ok(Json(result?))
}

/// Trade a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/token/refresh",
    tag = entity::user::Model::TAG,
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn refresh_token<R: UserRepository>(
    State(service): SharedService<R>,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> UserResult<Json<AccessResponse>> {
    let access = service.refresh(&input.refresh).await?;
    Ok(Json(AccessResponse { access }))
}

/// Revoke the refresh token and the current access token
#[utoipa::path(
    post,
    path = "/logout",
    tag = entity::user::Model::TAG,
    request_body = RefreshRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn logout<R: UserRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    user: CurrentUser,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> UserResult<Json<MessageResponse>> {
    service.logout(&claims, &input.refresh).await?;

    AuditEvent::new(Some(user.id), "user.logout", None, AuditOutcome::Success)
        .with_request(&headers)
        .log();

    Ok(Json(MessageResponse::new("Successfully logged out")))
}

/// The caller's account and favorites
#[utoipa::path(
    get,
    path = "/profile",
    tag = entity::user::Model::TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_profile<R: UserRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
) -> UserResult<Json<ProfileResponse>> {
    Ok(Json(service.profile(user.id).await?))
}

/// Update the caller's account
#[utoipa::path(
    put,
    path = "/profile",
    tag = entity::user::Model::TAG,
    request_body = UpdateProfile,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_profile<R: UserRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<UpdateProfile>,
) -> UserResult<Json<ProfileResponse>> {
    Ok(Json(service.update_profile(user.id, input).await?))
}

/// Update some fields of the caller's account
#[utoipa::path(
    patch,
    path = "/profile",
    tag = entity::user::Model::TAG,
    request_body = UpdateProfile,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn patch_profile<R: UserRepository>(
    state: SharedService<R>,
    user: CurrentUser,
    input: ValidatedJson<UpdateProfile>,
) -> UserResult<Json<ProfileResponse>> {
    update_profile(state, user, input).await
}

/// Add or remove a product from favorites
#[utoipa::path(
    post,
    path = "/toggle-favorite",
    tag = entity::user::Model::TAG,
    request_body = ToggleFavoriteRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Favorite toggled", body = ToggleFavoriteResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn toggle_favorite<R: UserRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<ToggleFavoriteRequest>,
) -> UserResult<Json<ToggleFavoriteResponse>> {
    let added = service.toggle_favorite(user.id, input.product_id).await?;
    let message = if added {
        "Product added to favorites"
    } else {
        "Product removed from favorites"
    };
    Ok(Json(ToggleFavoriteResponse {
        message: message.to_string(),
        added,
    }))
}

#[utoipa::path(
    get,
    path = "/favorites",
    tag = entity::user::Model::TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Favorite products", body = Vec<ProductSummary>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_favorites<R: UserRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
) -> UserResult<Json<Vec<ProductSummary>>> {
    Ok(Json(service.favorites(user.id).await?))
}

/// Specialists customers can chat with
#[utoipa::path(
    get,
    path = "/specialists",
    tag = entity::user::Model::TAG,
    responses(
        (status = 200, description = "All specialists", body = Vec<UserResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_specialists<R: UserRepository>(
    State(service): SharedService<R>,
) -> UserResult<Json<Vec<UserResponse>>> {
    Ok(Json(service.specialists().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OtpConfig;
    use crate::models::User;
    use crate::repository::MockUserRepository;
    use axum::body::Body;
    use axum::http::Request;
    use axum_helpers::{InMemoryTokenStore, JwtAuth, JwtConfig};
    use chrono::Utc;
    use domain_notifications::{Mailer, MemoryProvider, TemplateEngine};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn auth() -> JwtAuth {
        let config = JwtConfig::new("users-handler-test-secret-0123456789").unwrap();
        JwtAuth::new(&config, Arc::new(InMemoryTokenStore::new()))
    }

    fn app(repo: MockUserRepository, auth: JwtAuth) -> Router {
        let mailer = Mailer::new(
            Arc::new(MemoryProvider::new()),
            Arc::new(TemplateEngine::new().unwrap()),
            300,
        );
        router(UserService::new(repo, auth, mailer, OtpConfig::default()))
    }

    fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn account(id: Uuid) -> User {
        User {
            id,
            email: "malika@example.com".to_string(),
            name: "Malika".to_string(),
            surname: "Yusupova".to_string(),
            phone_number: "+998933334455".to_string(),
            avatar: None,
            role: UserRole::User,
            password_hash: "unused".to_string(),
            otp_code: None,
            otp_created_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_signup_returns_created_with_message() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().returning(|input| {
            let mut user = account(Uuid::now_v7());
            user.email = input.email;
            Ok(user)
        });

        let response = app(repo, auth())
            .oneshot(post_json(
                "/signup",
                None,
                json!({
                    "email": "malika@example.com",
                    "name": "Malika",
                    "surname": "Yusupova",
                    "phone_number": "+998933334455",
                    "password": "Secret#123",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["message"], "User created. OTP sent to email.");
        assert_eq!(body["user"]["email"], "malika@example.com");
    }

    #[tokio::test]
    async fn test_signup_with_invalid_email_is_bad_request() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let response = app(repo, auth())
            .oneshot(post_json(
                "/signup",
                None,
                json!({
                    "email": "not-an-email",
                    "name": "Malika",
                    "surname": "Yusupova",
                    "phone_number": "+998933334455",
                    "password": "Secret#123",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_signin_unknown_user_is_unauthorized() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let response = app(repo, auth())
            .oneshot(post_json(
                "/signin",
                None,
                json!({"email": "ghost@example.com", "password": "Secret#123"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_requires_token() {
        let response = app(MockUserRepository::new(), auth())
            .oneshot(
                Request::builder()
                    .uri("/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_then_access_token_is_rejected() {
        let auth = auth();
        let user_id = Uuid::now_v7();
        let pair = auth
            .issue_pair(&CurrentUser::new(user_id, "malika@example.com", "Malika", "user"))
            .await
            .unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(account(id))));
        repo.expect_favorite_products().returning(|_| Ok(vec![]));
        let app = app(repo, auth);

        let response = app
            .clone()
            .oneshot(post_json(
                "/logout",
                Some(&pair.access),
                json!({"refresh": pair.refresh}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["message"], "Successfully logged out");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/profile")
                    .header("authorization", format!("Bearer {}", pair.access))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_toggle_favorite_reports_added() {
        let auth = auth();
        let user_id = Uuid::now_v7();
        let product_id = Uuid::now_v7();
        let pair = auth
            .issue_pair(&CurrentUser::new(user_id, "malika@example.com", "Malika", "user"))
            .await
            .unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_product_exists().returning(|_| Ok(true));
        repo.expect_toggle_favorite()
            .withf(move |u, p| *u == user_id && *p == product_id)
            .returning(|_, _| Ok(true));

        let response = app(repo, auth)
            .oneshot(post_json(
                "/toggle-favorite",
                Some(&pair.access),
                json!({"product_id": product_id}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["added"], true);
    }
}
