//! Restaurant browsing and menus.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use nearfood_commerce::catalog::{MenuCategory, MenuItem, Restaurant};
use nearfood_store::{Filter, Select};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::routes::{pagination, PageQuery};
use crate::state::AppState;

#[derive(Deserialize)]
pub(crate) struct RestaurantQuery {
    page: Option<usize>,
    limit: Option<usize>,
    // Accepted for forward compatibility with distance sorting; listing
    // currently ignores the caller's position.
    #[allow(dead_code)]
    lat: Option<f64>,
    #[allow(dead_code)]
    lng: Option<f64>,
}

/// `GET /api/restaurants`: open restaurants, best-rated first.
pub(crate) async fn list(
    State(state): State<AppState>,
    Query(query): Query<RestaurantQuery>,
) -> Result<Json<Value>, AppError> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let restaurants: Vec<Restaurant> = state
        .store
        .fetch_all(
            &Select::from(Restaurant::TABLE)
                .eq("is_open", true)
                .order_desc("rating")
                .limit(page.limit())
                .offset(page.offset()),
        )
        .await?;
    let total = state
        .store
        .count(Restaurant::TABLE, &[Filter::eq("is_open", true)])
        .await?;

    Ok(Json(json!({
        "data": restaurants,
        "pagination": pagination(&page, total),
    })))
}

/// `GET /api/restaurants/{id}/menu`: available items with their
/// category names.
pub(crate) async fn menu(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Value>, AppError> {
    // 404 for an unknown restaurant rather than an empty menu.
    let _: Restaurant = state
        .store
        .fetch_one(&Select::from(Restaurant::TABLE).eq("id", restaurant_id.as_str()))
        .await?;

    let categories: Vec<MenuCategory> = state
        .store
        .fetch_all(
            &Select::from(MenuCategory::TABLE)
                .eq("restaurant_id", restaurant_id.as_str())
                .order_asc("display_order"),
        )
        .await?;
    let category_names: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let items: Vec<MenuItem> = state
        .store
        .fetch_all(
            &Select::from(MenuItem::TABLE)
                .eq("restaurant_id", restaurant_id.as_str())
                .eq("is_available", true)
                .order_asc("name")
                .limit(page.limit())
                .offset(page.offset()),
        )
        .await?;
    let total = state
        .store
        .count(
            MenuItem::TABLE,
            &[
                Filter::eq("restaurant_id", restaurant_id.as_str()),
                Filter::eq("is_available", true),
            ],
        )
        .await?;

    let data: Vec<Value> = items
        .iter()
        .map(|item| {
            let category_name = item
                .category_id
                .as_ref()
                .and_then(|id| category_names.get(id.as_str()))
                .copied();
            json!({
                "id": item.id,
                "restaurant_id": item.restaurant_id,
                "category_id": item.category_id,
                "category_name": category_name,
                "name": item.name,
                "description": item.description,
                "price": item.price,
                "is_veg": item.is_veg,
            })
        })
        .collect();

    Ok(Json(json!({
        "data": data,
        "pagination": pagination(&page, total),
    })))
}
