use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use axum_helpers::{
    AppError, AuditEvent, AuditOutcome, CurrentUser, JwtAuth, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use domain_orders::Order;
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::models::{AddToCart, CartLine, CartView, CheckoutRequest, UpdateCartItem};
use crate::repository::CartRepository;
use crate::service::CartService;

/// OpenAPI documentation for the cart endpoints
#[derive(OpenApi)]
#[openapi(
    paths(get_cart, add_to_cart, update_item, delete_item, checkout),
    components(
        schemas(CartView, CartLine, AddToCart, UpdateCartItem, CheckoutRequest),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = entity::cart::Model::TAG, description = "Shopping cart and checkout"))
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<CartService<R>>>;

pub fn router<R: CartRepository + 'static>(service: CartService<R>, auth: JwtAuth) -> Router {
    Router::new()
        .route("/", get(get_cart))
        .route("/add", post(add_to_cart))
        .route("/update/{item_id}", put(update_item))
        .route("/delete/{item_id}", delete(delete_item))
        .route("/checkout", post(checkout))
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware))
        .with_state(Arc::new(service))
}

/// The caller's cart, created on first access
#[utoipa::path(
    get,
    path = "",
    tag = entity::cart::Model::TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart", body = CartView),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_cart<R: CartRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
) -> Result<Json<CartView>, AppError> {
    Ok(Json(service.view(user.id).await?))
}

#[utoipa::path(
    post,
    path = "/add",
    tag = entity::cart::Model::TAG,
    request_body = AddToCart,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product added", body = CartView),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_to_cart<R: CartRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<AddToCart>,
) -> Result<impl IntoResponse, AppError> {
    let cart = service.add(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

/// Set the quantity of a cart line
#[utoipa::path(
    put,
    path = "/update/{item_id}",
    tag = entity::cart::Model::TAG,
    params(("item_id" = Uuid, Path, description = "Cart item ID")),
    request_body = UpdateCartItem,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart", body = CartView),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_item<R: CartRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(item_id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCartItem>,
) -> Result<Json<CartView>, AppError> {
    Ok(Json(
        service.update_item(user.id, item_id, input.quantity).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/delete/{item_id}",
    tag = entity::cart::Model::TAG,
    params(("item_id" = Uuid, Path, description = "Cart item ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Item removed"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_item<R: CartRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    UuidPath(item_id): UuidPath,
) -> Result<StatusCode, AppError> {
    service.remove_item(user.id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Place an order from the cart and empty it
#[utoipa::path(
    post,
    path = "/checkout",
    tag = entity::cart::Model::TAG,
    request_body = CheckoutRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn checkout<R: CartRepository>(
    State(service): SharedService<R>,
    user: CurrentUser,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<CheckoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    let order = service.checkout(user.id, request).await?;

    AuditEvent::new(
        Some(user.id),
        "order.place",
        Some(format!("order:{}", order.id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .with_details(json!({
        "source": "cart",
        "total_price": order.total_price,
        "lines": order.items.len(),
    }))
    .log();

    Ok((StatusCode::CREATED, Json(order)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CartError;
    use crate::repository::MockCartRepository;
    use crate::service::tests::{RecordingNotifier, cart_for};
    use axum::body::Body;
    use axum::http::Request;
    use axum_helpers::{InMemoryTokenStore, JwtConfig};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn auth() -> JwtAuth {
        let config = JwtConfig::new("cart-handler-test-secret-0123456789ab").unwrap();
        JwtAuth::new(&config, Arc::new(InMemoryTokenStore::new()))
    }

    async fn bearer(auth: &JwtAuth, id: Uuid) -> String {
        let user = CurrentUser::new(id, "otabek@example.com", "Otabek", "user");
        let pair = auth.issue_pair(&user).await.unwrap();
        format!("Bearer {}", pair.access)
    }

    fn app(mock_repo: MockCartRepository, auth: JwtAuth) -> Router {
        router(
            CartService::new(mock_repo, Arc::new(RecordingNotifier::default())),
            auth,
        )
    }

    #[tokio::test]
    async fn test_cart_requires_token() {
        let response = app(MockCartRepository::new(), auth())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_empty_cart_view() {
        let auth = auth();
        let user_id = Uuid::now_v7();
        let token = bearer(&auth, user_id).await;
        let cart = cart_for(user_id);
        let cart_id = cart.id;
        let mut mock_repo = MockCartRepository::new();
        mock_repo
            .expect_get_or_create()
            .returning(move |_| Ok(cart.clone()));
        mock_repo.expect_lines().returning(|_| Ok(vec![]));

        let response = app(mock_repo, auth)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("authorization", token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let view: CartView = serde_json::from_slice(&body).unwrap();
        assert_eq!(view.id, cart_id);
        assert_eq!(view.total_price, 0);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_bad_request() {
        let auth = auth();
        let user_id = Uuid::now_v7();
        let token = bearer(&auth, user_id).await;
        let cart = cart_for(user_id);
        let mut mock_repo = MockCartRepository::new();
        mock_repo
            .expect_get_or_create()
            .returning(move |_| Ok(cart.clone()));
        mock_repo
            .expect_checkout()
            .returning(|_, _, _| Err(CartError::Empty));

        let request = Request::builder()
            .method("POST")
            .uri("/checkout")
            .header("content-type", "application/json")
            .header("authorization", token)
            .body(Body::from(json!({"address": "Andijan"}).to_string()))
            .unwrap();
        let response = app(mock_repo, auth).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).contains("Cart is empty"));
    }

    #[tokio::test]
    async fn test_update_rejects_zero_quantity() {
        let auth = auth();
        let token = bearer(&auth, Uuid::now_v7()).await;
        let mut mock_repo = MockCartRepository::new();
        mock_repo.expect_set_quantity().never();

        let request = Request::builder()
            .method("PUT")
            .uri(format!("/update/{}", Uuid::now_v7()))
            .header("content-type", "application/json")
            .header("authorization", token)
            .body(Body::from(json!({"quantity": 0}).to_string()))
            .unwrap();
        let response = app(mock_repo, auth).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
