use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    cart::{CART_SESSION_KEY, Cart, CartAction, line_subtotal},
    dto::cart::{CartLine, CartView},
    entity::products::{Column as ProdCol, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    middleware::session::Session,
    response::{ApiResponse, Meta},
    services::product_service::product_from_entity,
    state::AppState,
};

pub async fn load_cart(state: &AppState, session: &Session) -> AppResult<Cart> {
    state.sessions().load(session.id, CART_SESSION_KEY).await
}

pub async fn save_cart(state: &AppState, session: &Session, cart: &Cart) -> AppResult<()> {
    state.sessions().save(session.id, CART_SESSION_KEY, cart).await
}

pub async fn view_cart(state: &AppState, session: &Session) -> AppResult<ApiResponse<CartView>> {
    let cart = load_cart(state, session).await?;
    let ids: Vec<Uuid> = cart.lines().map(|(id, _)| id).collect();

    let products: HashMap<Uuid, ProductModel> = if ids.is_empty() {
        HashMap::new()
    } else {
        Products::find()
            .filter(ProdCol::Id.is_in(ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect()
    };

    let total = cart.total(|id| products.get(&id).map(|p| p.price));
    let items: Vec<CartLine> = cart
        .lines()
        .filter_map(|(product_id, quantity)| {
            let Some(product) = products.get(&product_id) else {
                tracing::warn!(%product_id, session_id = %session.id, "skipping cart line for missing product");
                return None;
            };
            Some(CartLine {
                subtotal: line_subtotal(product.price, quantity),
                product: product_from_entity(product.clone()),
                quantity,
            })
        })
        .collect();

    let meta = Meta::with_total(items.len() as i64);
    Ok(ApiResponse::success("OK", CartView { items, total }, Some(meta)))
}

/// Add one unit of a product; the product must exist.
pub async fn add_to_cart(state: &AppState, session: &Session, product_id: Uuid) -> AppResult<i32> {
    let product = Products::find_by_id(product_id).one(&state.orm).await?;
    if product.is_none() {
        return Err(AppError::NotFound);
    }

    let mut cart = load_cart(state, session).await?;
    let quantity = cart.add(product_id);
    save_cart(state, session, &cart).await?;

    tracing::debug!(%product_id, quantity, "cart add");
    Ok(quantity)
}

pub async fn remove_from_cart(
    state: &AppState,
    session: &Session,
    product_id: Uuid,
) -> AppResult<bool> {
    let mut cart = load_cart(state, session).await?;
    let removed = cart.remove(product_id);
    save_cart(state, session, &cart).await?;
    Ok(removed)
}

pub async fn update_cart(
    state: &AppState,
    session: &Session,
    product_id: Uuid,
    action: CartAction,
) -> AppResult<Option<i32>> {
    let mut cart = load_cart(state, session).await?;
    let quantity = cart.update(product_id, action);
    save_cart(state, session, &cart).await?;

    tracing::debug!(%product_id, ?action, ?quantity, "cart update");
    Ok(quantity)
}
