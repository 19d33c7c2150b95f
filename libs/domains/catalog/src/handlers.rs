use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    AppError, AuditEvent, AuditOutcome, CurrentUser, JwtAuth, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::entity;
use crate::models::{
    AgeRange, Category, CategoryInput, CategoryTree, Comment, CommentInput, Faq, FaqInput,
    Product, ProductDetail, ProductFilter, ProductInput, Tag, TagInput,
};
use crate::repository::CatalogRepository;
use crate::service::CatalogService;

const SPECIALIST: &str = "specialist";

/// OpenAPI documentation for the catalog endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        get_category,
        create_category,
        update_category,
        delete_category,
        list_tags,
        get_tag,
        create_tag,
        update_tag,
        delete_tag,
        list_products,
        list_products_by_category,
        get_product,
        create_product,
        update_product,
        delete_product,
        list_comments,
        get_comment,
        create_comment,
        update_comment,
        delete_comment,
        list_faqs,
        get_faq,
        create_faq,
        update_faq,
        delete_faq,
    ),
    components(
        schemas(
            AgeRange, Category, CategoryInput, CategoryTree, Tag, TagInput, Product,
            ProductDetail, ProductInput, Comment, CommentInput, Faq, FaqInput
        ),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::category::Model::TAG, description = "Category tree"),
        (name = entity::tag::Model::TAG, description = "Product tags"),
        (name = entity::product::Model::TAG, description = "Products and search"),
        (name = entity::comment::Model::TAG, description = "Product reviews"),
        (name = entity::faq::Model::TAG, description = "Frequently asked questions")
    )
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<CatalogService<R>>>;

/// Catalog routes. Reads are public; writes go through `jwt_auth_middleware`.
pub fn router<R: CatalogRepository + 'static>(service: CatalogService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{id}", get(get_category))
        .route("/tags", get(list_tags))
        .route("/tags/{id}", get(get_tag))
        .route("/products", get(list_products))
        .route("/products/by_category/{category_id}", get(list_products_by_category))
        .route("/products/{id}", get(get_product))
        .route("/products/{product_id}/comments", get(list_comments))
        .route("/products/{product_id}/comments/{id}", get(get_comment))
        .route("/faq", get(list_faqs))
        .route("/faq/{id}", get(get_faq));

    let protected = Router::new()
        .route("/categories", post(create_category))
        .route("/categories/{id}", put(update_category).delete(delete_category))
        .route("/tags", post(create_tag))
        .route("/tags/{id}", put(update_tag).delete(delete_tag))
        .route("/products", post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/products/{product_id}/comments", post(create_comment))
        .route(
            "/products/{product_id}/comments/{id}",
            put(update_comment).delete(delete_comment),
        )
        .route("/faq", post(create_faq))
        .route("/faq/{id}", put(update_faq).delete(delete_faq))
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    public.merge(protected).with_state(shared_service)
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidUuid(format!("Invalid UUID: {}", raw)))
}

// ----------------------------------------------------------------------
// Categories
// ----------------------------------------------------------------------

/// Root categories with their subtrees
#[utoipa::path(
    get,
    path = "/categories",
    tag = entity::category::Model::TAG,
    responses(
        (status = 200, description = "Category forest", body = Vec<CategoryTree>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CatalogRepository>(
    State(service): SharedService<R>,
) -> Result<Json<Vec<CategoryTree>>, AppError> {
    Ok(Json(service.list_categories().await?))
}

/// A category with its subtree
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = entity::category::Model::TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category subtree", body = CategoryTree),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<R: CatalogRepository>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> Result<Json<CategoryTree>, AppError> {
    Ok(Json(service.get_category(id).await?))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = entity::category::Model::TAG,
    request_body = CategoryInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, description = "Parent category not found", body = axum_helpers::ErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CatalogRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<CategoryInput>,
) -> Result<impl IntoResponse, AppError> {
    user.require_role(SPECIALIST)?;
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Replace a category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = entity::category::Model::TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<R: CatalogRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<CategoryInput>,
) -> Result<Json<Category>, AppError> {
    user.require_role(SPECIALIST)?;
    Ok(Json(service.update_category(id, input).await?))
}

/// Delete a category, its children and their products
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = entity::category::Model::TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CatalogRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> Result<StatusCode, AppError> {
    user.require_role(SPECIALIST)?;
    service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------
// Tags
// ----------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/tags",
    tag = entity::tag::Model::TAG,
    responses(
        (status = 200, description = "All tags", body = Vec<Tag>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_tags<R: CatalogRepository>(
    State(service): SharedService<R>,
) -> Result<Json<Vec<Tag>>, AppError> {
    Ok(Json(service.list_tags().await?))
}

#[utoipa::path(
    get,
    path = "/tags/{id}",
    tag = entity::tag::Model::TAG,
    params(("id" = Uuid, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag found", body = Tag),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_tag<R: CatalogRepository>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> Result<Json<Tag>, AppError> {
    Ok(Json(service.get_tag(id).await?))
}

#[utoipa::path(
    post,
    path = "/tags",
    tag = entity::tag::Model::TAG,
    request_body = TagInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_tag<R: CatalogRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<TagInput>,
) -> Result<impl IntoResponse, AppError> {
    user.require_role(SPECIALIST)?;
    let tag = service.create_tag(input).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

#[utoipa::path(
    put,
    path = "/tags/{id}",
    tag = entity::tag::Model::TAG,
    params(("id" = Uuid, Path, description = "Tag ID")),
    request_body = TagInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tag updated", body = Tag),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_tag<R: CatalogRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<TagInput>,
) -> Result<Json<Tag>, AppError> {
    user.require_role(SPECIALIST)?;
    Ok(Json(service.update_tag(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/tags/{id}",
    tag = entity::tag::Model::TAG,
    params(("id" = Uuid, Path, description = "Tag ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_tag<R: CatalogRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> Result<StatusCode, AppError> {
    user.require_role(SPECIALIST)?;
    service.delete_tag(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------
// Products
// ----------------------------------------------------------------------

/// Search and filter products
#[utoipa::path(
    get,
    path = "/products",
    tag = entity::product::Model::TAG,
    params(ProductFilter),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: CatalogRepository>(
    State(service): SharedService<R>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(service.list_products(filter, None).await?))
}

/// Products filed directly under a category
#[utoipa::path(
    get,
    path = "/products/by_category/{category_id}",
    tag = entity::product::Model::TAG,
    params(
        ("category_id" = Uuid, Path, description = "Category ID"),
        ProductFilter
    ),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products_by_category<R: CatalogRepository>(
    State(service): SharedService<R>,
    UuidPath(category_id): UuidPath,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(service.list_products(filter, Some(category_id)).await?))
}

/// Product with its category and comments
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = entity::product::Model::TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductDetail),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: CatalogRepository>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> Result<Json<ProductDetail>, AppError> {
    Ok(Json(service.get_product(id).await?))
}

#[utoipa::path(
    post,
    path = "/products",
    tag = entity::product::Model::TAG,
    request_body = ProductInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, description = "Unknown category or tag", body = axum_helpers::ErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: CatalogRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> Result<impl IntoResponse, AppError> {
    user.require_role(SPECIALIST)?;
    let product = service.create_product(input).await?;

    AuditEvent::new(
        Some(user.id),
        "product.create",
        Some(format!("product:{}", product.id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .with_details(json!({
        "title": product.title,
        "price": product.price,
        "total": product.total,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = entity::product::Model::TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = ProductInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: CatalogRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> Result<Json<Product>, AppError> {
    user.require_role(SPECIALIST)?;
    let product = service.update_product(id, input).await?;

    AuditEvent::new(
        Some(user.id),
        "product.update",
        Some(format!("product:{}", id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .with_details(json!({ "price": product.price, "total": product.total }))
    .log();

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = entity::product::Model::TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: CatalogRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> Result<StatusCode, AppError> {
    user.require_role(SPECIALIST)?;
    service.delete_product(id).await?;

    AuditEvent::new(
        Some(user.id),
        "product.delete",
        Some(format!("product:{}", id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------
// Comments
// ----------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/products/{product_id}/comments",
    tag = entity::comment::Model::TAG,
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Comments, newest first", body = Vec<Comment>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_comments<R: CatalogRepository>(
    State(service): SharedService<R>,
    UuidPath(product_id): UuidPath,
) -> Result<Json<Vec<Comment>>, AppError> {
    Ok(Json(service.list_comments(product_id).await?))
}

#[utoipa::path(
    get,
    path = "/products/{product_id}/comments/{id}",
    tag = entity::comment::Model::TAG,
    params(
        ("product_id" = Uuid, Path, description = "Product ID"),
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment found", body = Comment),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_comment<R: CatalogRepository>(
    State(service): SharedService<R>,
    Path((product_id, id)): Path<(String, String)>,
) -> Result<Json<Comment>, AppError> {
    let (product_id, id) = (parse_id(&product_id)?, parse_id(&id)?);
    Ok(Json(service.get_comment(product_id, id).await?))
}

/// Review a product as the signed-in user
#[utoipa::path(
    post,
    path = "/products/{product_id}/comments",
    tag = entity::comment::Model::TAG,
    params(("product_id" = Uuid, Path, description = "Product ID")),
    request_body = CommentInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_comment<R: CatalogRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(product_id): UuidPath,
    ValidatedJson(input): ValidatedJson<CommentInput>,
) -> Result<impl IntoResponse, AppError> {
    let comment = service.create_comment(product_id, user.id, input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    put,
    path = "/products/{product_id}/comments/{id}",
    tag = entity::comment::Model::TAG,
    params(
        ("product_id" = Uuid, Path, description = "Product ID"),
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    request_body = CommentInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_comment<R: CatalogRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    Path((product_id, id)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<CommentInput>,
) -> Result<Json<Comment>, AppError> {
    let (product_id, id) = (parse_id(&product_id)?, parse_id(&id)?);
    Ok(Json(
        service.update_comment(product_id, id, user.id, input).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/products/{product_id}/comments/{id}",
    tag = entity::comment::Model::TAG,
    params(
        ("product_id" = Uuid, Path, description = "Product ID"),
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_comment<R: CatalogRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    Path((product_id, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let (product_id, id) = (parse_id(&product_id)?, parse_id(&id)?);
    service.delete_comment(product_id, id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------
// FAQ
// ----------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/faq",
    tag = entity::faq::Model::TAG,
    responses(
        (status = 200, description = "All FAQ entries", body = Vec<Faq>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_faqs<R: CatalogRepository>(
    State(service): SharedService<R>,
) -> Result<Json<Vec<Faq>>, AppError> {
    Ok(Json(service.list_faqs().await?))
}

#[utoipa::path(
    get,
    path = "/faq/{id}",
    tag = entity::faq::Model::TAG,
    params(("id" = Uuid, Path, description = "FAQ ID")),
    responses(
        (status = 200, description = "FAQ entry found", body = Faq),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_faq<R: CatalogRepository>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> Result<Json<Faq>, AppError> {
    Ok(Json(service.get_faq(id).await?))
}

#[utoipa::path(
    post,
    path = "/faq",
    tag = entity::faq::Model::TAG,
    request_body = FaqInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "FAQ entry created", body = Faq),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_faq<R: CatalogRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<FaqInput>,
) -> Result<impl IntoResponse, AppError> {
    user.require_role(SPECIALIST)?;
    let faq = service.create_faq(input).await?;
    Ok((StatusCode::CREATED, Json(faq)))
}

#[utoipa::path(
    put,
    path = "/faq/{id}",
    tag = entity::faq::Model::TAG,
    params(("id" = Uuid, Path, description = "FAQ ID")),
    request_body = FaqInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "FAQ entry updated", body = Faq),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_faq<R: CatalogRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<FaqInput>,
) -> Result<Json<Faq>, AppError> {
    user.require_role(SPECIALIST)?;
    Ok(Json(service.update_faq(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/faq/{id}",
    tag = entity::faq::Model::TAG,
    params(("id" = Uuid, Path, description = "FAQ ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "FAQ entry deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_faq<R: CatalogRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> Result<StatusCode, AppError> {
    user.require_role(SPECIALIST)?;
    service.delete_faq(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
