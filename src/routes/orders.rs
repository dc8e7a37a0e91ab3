use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderList, OrderWithItems},
    error::AppResult,
    middleware::{auth::AuthUser, session::Session},
    response::{ApiResponse, Meta},
    services::order_service::{self, CheckoutOutcome},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checkout/", post(checkout))
        .route("/orders/", get(list_orders))
        .route("/orders/{id}/", get(get_order))
}

#[utoipa::path(
    post,
    path = "/checkout/",
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<OrderWithItems>),
        (status = 303, description = "Empty cart (to /) or insufficient stock (to /cart/)"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "A product in the cart no longer exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    session: Session,
) -> AppResult<Response> {
    let outcome = order_service::checkout(&state, &user, &session).await?;
    let response = match outcome {
        CheckoutOutcome::Placed(order) => Json(ApiResponse::success(
            "Checkout success",
            order,
            Some(Meta::empty()),
        ))
        .into_response(),
        CheckoutOutcome::EmptyCart => Redirect::to("/").into_response(),
        CheckoutOutcome::InsufficientStock { .. } => Redirect::to("/cart/").into_response(),
    };
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/orders/",
    responses(
        (status = 200, description = "Caller's orders, newest first", body = ApiResponse<OrderList>),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/{id}/",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}
