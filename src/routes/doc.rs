use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::CartAction,
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{CartLine, CartView},
        orders::{OrderList, OrderWithItems},
        products::ProductListing,
    },
    models::{Category, Order, OrderItem, Product, User},
    response::{ApiResponse, Meta},
    routes::{auth, cart, health, orders, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        products::list_products,
        products::get_product,
        cart::view_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::update_cart,
        orders::checkout,
        orders::list_orders,
        orders::get_order
    ),
    components(
        schemas(
            User,
            Category,
            Product,
            Order,
            OrderItem,
            CartAction,
            CartLine,
            CartView,
            OrderList,
            OrderWithItems,
            ProductListing,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            params::CatalogQuery,
            health::HealthData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductListing>,
            ApiResponse<CartView>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog browsing and search"),
        (name = "Cart", description = "Session cart"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
