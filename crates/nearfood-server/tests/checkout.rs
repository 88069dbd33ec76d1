//! End-to-end checkout and payment flows.

mod common;

use axum::http::{Method, StatusCode};
use nearfood_commerce::cart::{Cart, CartItem};
use nearfood_commerce::checkout::{Order, OrderItem};
use nearfood_store::Select;
use serde_json::json;

use common::{delivery_body, spawn_app};

#[tokio::test]
async fn checkout_writes_the_order_and_clears_the_cart() {
    let app = spawn_app();
    let token = app.signup("ada@example.com").await;
    let rest = app.seed_restaurant("Bella", 4.5).await;
    let a = app.seed_menu_item(&rest, "Dish A", 1000).await;
    let b = app.seed_menu_item(&rest, "Dish B", 500).await;

    app.add_to_cart(&token, &rest, &a, 2).await;
    app.add_to_cart(&token, &rest, &b, 1).await;

    let (status, order) = app.post("/api/orders", Some(&token), delivery_body()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["total_amount"], 2999);
    assert_eq!(order["status"], "PLACED");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);

    // The cart is emptied and unpinned.
    let (_, cart) = app.get("/api/cart", Some(&token)).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
    assert!(cart["cart"]["restaurant_id"].is_null());

    // Exactly one order with two item snapshots in the store.
    assert_eq!(app.state.store.count(Order::TABLE, &[]).await.unwrap(), 1);
    assert_eq!(app.state.store.count(OrderItem::TABLE, &[]).await.unwrap(), 2);
}

#[tokio::test]
async fn checkout_on_an_empty_cart_is_rejected() {
    let app = spawn_app();
    let token = app.signup("ada@example.com").await;

    let (status, body) = app.post("/api/orders", Some(&token), delivery_body()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cart is empty");
    assert_eq!(app.state.store.count(Order::TABLE, &[]).await.unwrap(), 0);
}

#[tokio::test]
async fn stale_cart_line_fails_checkout_without_writing() {
    let app = spawn_app();
    let token = app.signup("ada@example.com").await;
    let rest = app.seed_restaurant("Bella", 4.5).await;
    let item = app.seed_menu_item(&rest, "Dish A", 1000).await;
    app.add_to_cart(&token, &rest, &item, 1).await;

    // The menu item disappears after it was carted.
    app.state
        .store
        .delete(
            nearfood_commerce::catalog::MenuItem::TABLE,
            &[nearfood_store::Filter::eq("id", item.as_str())],
        )
        .await
        .unwrap();

    let (status, body) = app.post("/api/orders", Some(&token), delivery_body()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("missing item information"));
    assert_eq!(app.state.store.count(Order::TABLE, &[]).await.unwrap(), 0);
    assert_eq!(app.state.store.count(OrderItem::TABLE, &[]).await.unwrap(), 0);
}

#[tokio::test]
async fn orders_are_owner_scoped() {
    let app = spawn_app();
    let ada = app.signup("ada@example.com").await;
    let eve = app.signup("eve@example.com").await;
    let rest = app.seed_restaurant("Bella", 4.5).await;
    let item = app.seed_menu_item(&rest, "Dish A", 1000).await;
    app.add_to_cart(&ada, &rest, &item, 1).await;

    let (_, order) = app.post("/api/orders", Some(&ada), delivery_body()).await;
    let id = order["id"].as_str().unwrap();

    let (status, _) = app.get(&format!("/api/orders/{id}"), Some(&ada)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/orders/{id}"), Some(&eve)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = app.get("/api/orders", Some(&eve)).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn order_patch_honors_the_allow_list() {
    let app = spawn_app();
    let token = app.signup("ada@example.com").await;
    let rest = app.seed_restaurant("Bella", 4.5).await;
    let item = app.seed_menu_item(&rest, "Dish A", 1000).await;
    app.add_to_cart(&token, &rest, &item, 1).await;
    let (_, order) = app.post("/api/orders", Some(&token), delivery_body()).await;
    let id = order["id"].as_str().unwrap();
    let uri = format!("/api/orders/{id}");

    // Nothing allow-listed in the body.
    let (status, body) = app
        .request(Method::PATCH, &uri, Some(&token), Some(json!({ "total_amount": 1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No valid fields to update");

    let (status, body) = app
        .request(Method::PATCH, &uri, Some(&token), Some(json!({ "status": "DELIVERED" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "DELIVERED");
    // The disallowed field never landed: 1000 + 299 fee + 80 tax.
    assert_eq!(body["total_amount"], 1379);

    let (status, _) = app
        .request(Method::PATCH, &uri, Some(&token), Some(json!({ "status": "TELEPORTED" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dummy_payment_flow_creates_a_paid_order() {
    let app = spawn_app();
    let token = app.signup("ada@example.com").await;
    let rest = app.seed_restaurant("Bella", 4.5).await;
    let a = app.seed_menu_item(&rest, "Dish A", 1000).await;
    let b = app.seed_menu_item(&rest, "Dish B", 500).await;
    app.add_to_cart(&token, &rest, &a, 2).await;
    app.add_to_cart(&token, &rest, &b, 1).await;

    let (status, session) = app
        .post("/api/payments/create-order", Some(&token), json!({ "amount": 2999 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["dummy"], true);
    let session_id = session["session_id"].as_str().unwrap();
    assert!(session_id.starts_with("dummy_session_"));

    let (_, cart) = app.get("/api/cart", Some(&token)).await;
    let cart_id = cart["cart"]["id"].as_str().unwrap();

    let mut verify = delivery_body();
    verify["session_id"] = json!(session_id);
    verify["cart_id"] = json!(cart_id);
    verify["amount"] = json!(2999);
    let (status, body) = app.post("/api/payments/verify", Some(&token), verify).await;
    assert_eq!(status, StatusCode::OK, "verify failed: {body}");
    assert_eq!(body["payment_status"], "paid");
    assert_eq!(body["total"], 2999);

    // The order carries the session id and the cart is cleared.
    let order: Order = app
        .state
        .store
        .fetch_one(&Select::from(Order::TABLE).eq("id", body["order_id"].as_str().unwrap()))
        .await
        .unwrap();
    assert_eq!(order.payment_id.as_deref(), Some(session_id));
    assert_eq!(app.state.store.count(CartItem::TABLE, &[]).await.unwrap(), 0);
    let cart: Cart = app
        .state
        .store
        .fetch_one(&Select::from(Cart::TABLE).eq("id", cart_id))
        .await
        .unwrap();
    assert!(cart.restaurant_id.is_none());
}

#[tokio::test]
async fn payment_amount_is_bounded() {
    let app = spawn_app();
    let token = app.signup("ada@example.com").await;

    for amount in [0, -500, 100_000_01] {
        let (status, _) = app
            .post("/api/payments/create-order", Some(&token), json!({ "amount": amount }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount {amount} accepted");
    }
}

#[tokio::test]
async fn mismatched_payment_amount_is_rejected() {
    let app = spawn_app();
    let token = app.signup("ada@example.com").await;
    let rest = app.seed_restaurant("Bella", 4.5).await;
    let item = app.seed_menu_item(&rest, "Dish A", 1000).await;
    app.add_to_cart(&token, &rest, &item, 1).await;

    let (_, session) = app
        .post("/api/payments/create-order", Some(&token), json!({ "amount": 500 }))
        .await;
    let (_, cart) = app.get("/api/cart", Some(&token)).await;

    let mut verify = delivery_body();
    verify["session_id"] = session["session_id"].clone();
    verify["cart_id"] = cart["cart"]["id"].clone();
    // Cart totals 1000 + 299 + 80 = 1379; 500 is far outside tolerance.
    verify["amount"] = json!(500);
    let (status, body) = app.post("/api/payments/verify", Some(&token), verify).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("does not match"));
    assert_eq!(app.state.store.count(Order::TABLE, &[]).await.unwrap(), 0);
}
