use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    AppError, AuditEvent, AuditOutcome, CurrentUser, JwtAuth, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::models::{Banner, CreateBanner, UpdateBanner};
use crate::repository::BannerRepository;
use crate::service::BannerService;

const SPECIALIST: &str = "specialist";

/// OpenAPI documentation for the banner endpoints
#[derive(OpenApi)]
#[openapi(
    paths(list_banners, get_banner, create_banner, update_banner, delete_banner),
    components(
        schemas(Banner, CreateBanner, UpdateBanner),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = entity::Model::TAG, description = "Home page banners"))
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<BannerService<R>>>;

pub fn router<R: BannerRepository + 'static>(service: BannerService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/", get(list_banners))
        .route("/{id}", get(get_banner));

    let protected = Router::new()
        .route("/", post(create_banner))
        .route("/{id}", put(update_banner).delete(delete_banner))
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    public.merge(protected).with_state(shared_service)
}

/// All banners, newest first
#[utoipa::path(
    get,
    path = "",
    tag = entity::Model::TAG,
    responses(
        (status = 200, description = "Banners", body = Vec<Banner>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_banners<R: BannerRepository>(
    State(service): SharedService<R>,
) -> Result<Json<Vec<Banner>>, AppError> {
    Ok(Json(service.list_banners().await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(("id" = Uuid, Path, description = "Banner ID")),
    responses(
        (status = 200, description = "Banner", body = Banner),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_banner<R: BannerRepository>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> Result<Json<Banner>, AppError> {
    Ok(Json(service.get_banner(id).await?))
}

/// Create a banner
#[utoipa::path(
    post,
    path = "",
    tag = entity::Model::TAG,
    request_body = CreateBanner,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Banner created", body = Banner),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_banner<R: BannerRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateBanner>,
) -> Result<impl IntoResponse, AppError> {
    user.require_role(SPECIALIST)?;
    let banner = service.create_banner(input).await?;

    AuditEvent::new(
        Some(user.id),
        "banner.create",
        Some(format!("banner:{}", banner.id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .log();

    Ok((StatusCode::CREATED, Json(banner)))
}

/// Update the given banner fields
#[utoipa::path(
    put,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(("id" = Uuid, Path, description = "Banner ID")),
    request_body = UpdateBanner,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Banner updated", body = Banner),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_banner<R: BannerRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateBanner>,
) -> Result<Json<Banner>, AppError> {
    user.require_role(SPECIALIST)?;
    Ok(Json(service.update_banner(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(("id" = Uuid, Path, description = "Banner ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Banner deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_banner<R: BannerRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> Result<StatusCode, AppError> {
    user.require_role(SPECIALIST)?;
    service.delete_banner(id).await?;

    AuditEvent::new(
        Some(user.id),
        "banner.delete",
        Some(format!("banner:{}", id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}
