use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
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

use crate::entity;
use crate::models::{
    CreateOrderRequest, Order, OrderItem, OrderLineRequest, OrderStatus, UpdateStatusRequest,
};
use crate::repository::OrderRepository;
use crate::service::OrderService;

const SPECIALIST: &str = "specialist";

/// OpenAPI documentation for the order endpoints
#[derive(OpenApi)]
#[openapi(
    paths(create_order, my_orders, get_order, update_order_status),
    components(
        schemas(
            Order, OrderItem, OrderStatus, OrderLineRequest, CreateOrderRequest,
            UpdateStatusRequest
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
    tags((name = entity::order::Model::TAG, description = "Order placement and fulfilment"))
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<OrderService<R>>>;

/// Order routes. Every endpoint needs a bearer token.
pub fn router<R: OrderRepository + 'static>(service: OrderService<R>, auth: JwtAuth) -> Router {
    Router::new()
        .route("/create", post(create_order))
        .route("/my-orders", get(my_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/status", patch(update_order_status))
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware))
        .with_state(Arc::new(service))
}

/// Place an order for the given products
#[utoipa::path(
    post,
    path = "/create",
    tag = entity::order::Model::TAG,
    request_body = CreateOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_order<R: OrderRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let order = service.place_order(user.id, request).await?;

    AuditEvent::new(
        Some(user.id),
        "order.place",
        Some(format!("order:{}", order.id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .with_details(json!({
        "total_price": order.total_price,
        "lines": order.items.len(),
    }))
    .log();

    Ok((StatusCode::CREATED, Json(order)))
}

/// The caller's orders, newest first
#[utoipa::path(
    get,
    path = "/my-orders",
    tag = entity::order::Model::TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Orders", body = Vec<Order>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn my_orders<R: OrderRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(service.my_orders(user.id).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = entity::order::Model::TAG,
    params(("id" = Uuid, Path, description = "Order ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order", body = Order),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_order<R: OrderRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> Result<Json<Order>, AppError> {
    let order = service
        .get_order(id, user.id, user.has_role(SPECIALIST))
        .await?;
    Ok(Json(order))
}

/// Move an order along its lifecycle
#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = entity::order::Model::TAG,
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status changed", body = Order),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_order_status<R: OrderRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    user.require_role(SPECIALIST)?;

    let result = service.update_status(id, request.status).await;
    let outcome = if result.is_ok() {
        AuditOutcome::Success
    } else {
        AuditOutcome::Failure
    };
    AuditEvent::new(
        Some(user.id),
        "order.status",
        Some(format!("order:{}", id)),
        outcome,
    )
    .with_request(&headers)
    .with_details(json!({ "status": request.status }))
    .log();

    Ok(Json(result?))
}
