//! Shared helpers for the HTTP integration tests. Everything runs
//! against the in-memory backend with dummy payments.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use nearfood_commerce::catalog::{MenuItem, Restaurant};
use nearfood_commerce::{MenuItemId, Money, RestaurantId};
use nearfood_server::{app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn spawn_app() -> TestApp {
    let state = AppState::in_memory();
    TestApp {
        router: app(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    /// Register an account and return its bearer token.
    pub async fn signup(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/signup",
                None,
                json!({ "email": email, "password": "Secure#Pass1" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "signup failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Insert a restaurant directly into the store and return its id.
    pub async fn seed_restaurant(&self, name: &str, rating: f64) -> RestaurantId {
        let restaurant = Restaurant {
            id: RestaurantId::generate(),
            name: name.into(),
            address: "1 Test Street".into(),
            image_url: None,
            lat: 40.0,
            lng: -74.0,
            cuisine: "Test".into(),
            rating,
            delivery_time_min: 30,
            price_range: "$$".into(),
            is_open: true,
        };
        self.state
            .store
            .insert_value(Restaurant::TABLE, &restaurant)
            .await
            .unwrap();
        restaurant.id
    }

    /// Insert a menu item with a fixed price and return its id.
    pub async fn seed_menu_item(
        &self,
        restaurant_id: &RestaurantId,
        name: &str,
        price_cents: i64,
    ) -> MenuItemId {
        let item = MenuItem {
            id: MenuItemId::generate(),
            restaurant_id: restaurant_id.clone(),
            category_id: None,
            name: name.into(),
            description: None,
            price: Money::from_cents(price_cents),
            is_available: true,
            is_veg: false,
        };
        self.state
            .store
            .insert_value(MenuItem::TABLE, &item)
            .await
            .unwrap();
        item.id
    }

    /// Add a menu item to the caller's cart through the API.
    pub async fn add_to_cart(
        &self,
        token: &str,
        restaurant_id: &RestaurantId,
        menu_item_id: &MenuItemId,
        quantity: i64,
    ) -> (StatusCode, Value) {
        self.post(
            "/api/cart",
            Some(token),
            json!({
                "restaurant_id": restaurant_id.as_str(),
                "menu_item_id": menu_item_id.as_str(),
                "quantity": quantity,
            }),
        )
        .await
    }
}

pub fn delivery_body() -> Value {
    json!({
        "delivery_address": "123 Long Enough Street, Foodville",
        "delivery_phone": "555-010-0100",
        "delivery_name": "Ada Lovelace",
    })
}
