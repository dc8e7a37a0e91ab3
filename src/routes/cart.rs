use axum::{
    Json, Router,
    extract::{Path, State},
    response::Redirect,
    routing::get,
};
use uuid::Uuid;

use crate::{
    cart::CartAction,
    dto::cart::CartView,
    error::AppResult,
    middleware::session::Session,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add-to-cart/{product_id}/", get(add_to_cart).post(add_to_cart))
        .route("/cart/", get(view_cart))
        .route("/remove/{product_id}/", get(remove_from_cart))
        .route("/update/{product_id}/{action}/", get(update_cart))
}

#[utoipa::path(
    get,
    path = "/cart/",
    responses(
        (status = 200, description = "Cart lines with subtotals and total", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::view_cart(&state, &session).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/add-to-cart/{product_id}/",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 303, description = "Added one unit; redirects to the product list"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<Uuid>,
) -> AppResult<Redirect> {
    cart_service::add_to_cart(&state, &session, product_id).await?;
    Ok(Redirect::to("/"))
}

#[utoipa::path(
    get,
    path = "/remove/{product_id}/",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 303, description = "Line removed (if present); redirects to the cart"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<Uuid>,
) -> AppResult<Redirect> {
    cart_service::remove_from_cart(&state, &session, product_id).await?;
    Ok(Redirect::to("/cart/"))
}

#[utoipa::path(
    get,
    path = "/update/{product_id}/{action}/",
    params(
        ("product_id" = Uuid, Path, description = "Product ID"),
        ("action" = CartAction, Path, description = "increase or decrease")
    ),
    responses(
        (status = 303, description = "Quantity stepped; redirects to the cart"),
        (status = 400, description = "Unknown action"),
    ),
    tag = "Cart"
)]
pub async fn update_cart(
    State(state): State<AppState>,
    session: Session,
    Path((product_id, action)): Path<(Uuid, CartAction)>,
) -> AppResult<Redirect> {
    cart_service::update_cart(&state, &session, product_id, action).await?;
    Ok(Redirect::to("/cart/"))
}
