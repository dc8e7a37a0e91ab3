use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    cart::line_subtotal,
    config::StockPolicy,
    dto::orders::{OrderList, OrderWithItems},
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{ActiveModel as ProductActive, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::{auth::AuthUser, session::Session},
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    services::cart_service::{load_cart, save_cart},
    state::AppState,
};

#[derive(Debug)]
pub enum CheckoutOutcome {
    Placed(OrderWithItems),
    /// Nothing to check out; no database work was done.
    EmptyCart,
    /// A line asked for more than the product had. The transaction was rolled back.
    InsufficientStock {
        product_id: Uuid,
        requested: i32,
        available: i32,
    },
}

/// Whether a line of `quantity` may be taken from `stock` under `policy`.
pub fn stock_allows(policy: StockPolicy, stock: i32, quantity: i32) -> bool {
    match policy {
        StockPolicy::Enforce => stock >= quantity,
        StockPolicy::Unchecked => true,
    }
}

/// Turn the session cart into an order in one transaction: one order item per
/// line with a price snapshot, stock decremented per line, cart cleared after
/// commit.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    session: &Session,
) -> AppResult<CheckoutOutcome> {
    let mut cart = load_cart(state, session).await?;
    if cart.is_empty() {
        return Ok(CheckoutOutcome::EmptyCart);
    }

    let policy = state.config.stock_policy;
    let txn = state.orm.begin().await?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        total_price: Set(0),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut total_price: i64 = 0;
    let mut order_items: Vec<OrderItem> = Vec::with_capacity(cart.len());

    for (product_id, quantity) in cart.lines() {
        if quantity <= 0 {
            txn.rollback().await?;
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }

        let product = Products::find_by_id(product_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?;
        let product = match product {
            Some(p) => p,
            None => {
                txn.rollback().await?;
                tracing::info!(%product_id, "checkout rejected: product no longer exists");
                return Err(AppError::NotFound);
            }
        };

        if !stock_allows(policy, product.stock, quantity) {
            txn.rollback().await?;
            tracing::info!(
                user_id = %user.user_id,
                %product_id,
                requested = quantity,
                available = product.stock,
                "checkout rejected: insufficient stock"
            );
            return Ok(CheckoutOutcome::InsufficientStock {
                product_id,
                requested: quantity,
                available: product.stock,
            });
        }

        let price = product.price;
        total_price += line_subtotal(price, quantity);

        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            price: Set(price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        order_items.push(order_item_from_entity(item));

        let remaining = product.stock - quantity;
        let mut product: ProductActive = product.into();
        product.stock = Set(remaining);
        product.update(&txn).await?;
    }

    let mut active: OrderActive = order.into();
    active.total_price = Set(total_price);
    let order = active.update(&txn).await?;

    txn.commit().await?;

    // The order is committed; a failed cart write must not turn it into an error.
    cart.clear();
    if let Err(err) = save_cart(state, session, &cart).await {
        tracing::warn!(
            error = %err,
            order_id = %order.id,
            session_id = %session.id,
            "failed to clear cart after checkout"
        );
    }

    tracing::info!(
        user_id = %user.user_id,
        order_id = %order.id,
        total_price,
        lines = order_items.len(),
        "checkout completed"
    );

    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::Checkout,
        serde_json::json!({ "order_id": order.id, "total_price": total_price }),
    )
    .await;

    Ok(CheckoutOutcome::Placed(OrderWithItems {
        order: order_from_entity(order),
        items: order_items,
    }))
}

/// The caller's orders, newest first.
pub async fn list_orders(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderList>> {
    let orders: Vec<Order> = Orders::find()
        .filter(OrderCol::UserId.eq(user.user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::with_total(orders.len() as i64);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .order_by_asc(OrderItemCol::ProductId)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        total_price: model.total_price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
