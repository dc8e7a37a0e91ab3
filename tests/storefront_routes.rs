mod common;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, StatusCode, header},
};
use axum_storefront::{app::build_app, config::StockPolicy, services::auth_service::issue_token};
use common::{create_category, create_product, create_user, stock_of, unique};
use tower::ServiceExt;
use uuid::Uuid;

struct Visitor<'a> {
    app: &'a Router,
    session: Uuid,
    token: String,
}

impl Visitor<'_> {
    async fn send(&self, method: Method, uri: &str) -> anyhow::Result<Response<Body>> {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, format!("sessionid={}", self.session))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .body(Body::empty())?;
        Ok(self.app.clone().oneshot(req).await?)
    }

    async fn json(&self, method: Method, uri: &str) -> anyhow::Result<serde_json::Value> {
        let response = self.send(method, uri).await?;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

fn assert_redirect(response: &Response<Body>, to: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), Some(to));
}

// Cart and checkout endpoints answer with the documented redirects.
#[tokio::test]
async fn cart_and_checkout_routes_redirect() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::connect_state(&database_url, StockPolicy::Enforce).await?;
    let app = build_app(state.clone());

    let user_id = create_user(&state, &format!("{}@example.com", Uuid::new_v4())).await?;
    let token = issue_token(user_id, common::JWT_SECRET)?;
    let category = create_category(&state, &unique("Lighting")).await?;
    let lamp = create_product(&state, &unique("Desk Lamp"), "Warm light", 1_500, 2, category).await?;
    let rug = create_product(&state, &unique("Rug"), "Wool", 900, 5, category).await?;

    let shopper = Visitor {
        app: &app,
        session: Uuid::new_v4(),
        token: token.clone(),
    };

    // Adding goes back to the catalog; unknown products are 404.
    let response = shopper
        .send(Method::POST, &format!("/add-to-cart/{}/", Uuid::new_v4()))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = shopper.send(Method::POST, &format!("/add-to-cart/{lamp}/")).await?;
    assert_redirect(&response, "/");
    let response = shopper.send(Method::GET, &format!("/add-to-cart/{rug}/")).await?;
    assert_redirect(&response, "/");

    // Update and remove go back to the cart.
    let response = shopper.send(Method::GET, &format!("/update/{lamp}/increase/")).await?;
    assert_redirect(&response, "/cart/");
    let response = shopper.send(Method::GET, &format!("/update/{rug}/decrease/")).await?;
    assert_redirect(&response, "/cart/");
    shopper.send(Method::GET, &format!("/add-to-cart/{rug}/")).await?;
    let response = shopper.send(Method::GET, &format!("/remove/{rug}/")).await?;
    assert_redirect(&response, "/cart/");

    let cart = shopper.json(Method::GET, "/cart/").await?;
    assert_eq!(cart["data"]["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(cart["data"]["items"][0]["product"]["id"], lamp.to_string());
    assert_eq!(cart["data"]["items"][0]["quantity"], 2);
    assert_eq!(cart["data"]["total"], 3_000);

    // An empty cart sends the shopper back to the catalog.
    let browser = Visitor {
        app: &app,
        session: Uuid::new_v4(),
        token: token.clone(),
    };
    let response = browser.send(Method::POST, "/checkout/").await?;
    assert_redirect(&response, "/");

    // Too many units sends the shopper back to the cart and changes nothing.
    shopper.send(Method::GET, &format!("/update/{lamp}/increase/")).await?;
    let response = shopper.send(Method::POST, "/checkout/").await?;
    assert_redirect(&response, "/cart/");
    assert_eq!(stock_of(&state, lamp).await?, 2);

    shopper.send(Method::GET, &format!("/update/{lamp}/decrease/")).await?;
    let placed = shopper.json(Method::POST, "/checkout/").await?;
    assert_eq!(placed["data"]["order"]["total_price"], 3_000);
    assert_eq!(placed["data"]["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(stock_of(&state, lamp).await?, 0);

    let cart = shopper.json(Method::GET, "/cart/").await?;
    assert_eq!(cart["data"]["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(cart["data"]["total"], 0);

    let history = shopper.json(Method::GET, "/orders/").await?;
    assert_eq!(
        history["data"]["items"][0]["id"],
        placed["data"]["order"]["id"]
    );
    Ok(())
}
