//! Demo dataset seeding.
//!
//! Upserts a small set of restaurants with their menus so a fresh
//! deployment has something to browse. Rows are matched by name, so
//! running the seed repeatedly refreshes the data instead of
//! duplicating it.

use nearfood_commerce::catalog::{MenuCategory, MenuItem, Restaurant};
use nearfood_commerce::{CategoryId, MenuItemId, Money, RestaurantId};
use nearfood_store::{Select, Store, StoreError};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
pub struct SeedSummary {
    pub restaurants: usize,
    pub categories: usize,
    pub menu_items: usize,
}

struct RestaurantSeed {
    name: &'static str,
    address: &'static str,
    lat: f64,
    lng: f64,
    cuisine: &'static str,
    rating: f64,
    delivery_time_min: u32,
    price_range: &'static str,
    menu: &'static [CategorySeed],
}

struct CategorySeed {
    name: &'static str,
    items: &'static [ItemSeed],
}

struct ItemSeed {
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    is_veg: bool,
}

const DATASET: &[RestaurantSeed] = &[
    RestaurantSeed {
        name: "Bella Napoli",
        address: "12 Via Roma, Downtown",
        lat: 40.7128,
        lng: -74.0060,
        cuisine: "Italian",
        rating: 4.7,
        delivery_time_min: 35,
        price_range: "$$",
        menu: &[
            CategorySeed {
                name: "Pizza",
                items: &[
                    ItemSeed {
                        name: "Margherita",
                        description: "San Marzano tomatoes, fior di latte, basil",
                        price_cents: 1250,
                        is_veg: true,
                    },
                    ItemSeed {
                        name: "Diavola",
                        description: "Spicy salami, chili oil",
                        price_cents: 1450,
                        is_veg: false,
                    },
                ],
            },
            CategorySeed {
                name: "Pasta",
                items: &[
                    ItemSeed {
                        name: "Cacio e Pepe",
                        description: "Pecorino romano, black pepper",
                        price_cents: 1350,
                        is_veg: true,
                    },
                    ItemSeed {
                        name: "Ragu alla Bolognese",
                        description: "Slow-cooked beef ragu, tagliatelle",
                        price_cents: 1550,
                        is_veg: false,
                    },
                ],
            },
        ],
    },
    RestaurantSeed {
        name: "Spice Route",
        address: "45 Curry Avenue, Midtown",
        lat: 40.7549,
        lng: -73.9840,
        cuisine: "Indian",
        rating: 4.9,
        delivery_time_min: 45,
        price_range: "$$",
        menu: &[
            CategorySeed {
                name: "Curries",
                items: &[
                    ItemSeed {
                        name: "Butter Chicken",
                        description: "Tandoori chicken in tomato-butter gravy",
                        price_cents: 1600,
                        is_veg: false,
                    },
                    ItemSeed {
                        name: "Palak Paneer",
                        description: "Cottage cheese in spinach gravy",
                        price_cents: 1400,
                        is_veg: true,
                    },
                ],
            },
            CategorySeed {
                name: "Breads",
                items: &[
                    ItemSeed {
                        name: "Garlic Naan",
                        description: "Tandoor-baked, brushed with garlic butter",
                        price_cents: 400,
                        is_veg: true,
                    },
                ],
            },
        ],
    },
    RestaurantSeed {
        name: "Tokyo Bowl",
        address: "8 Sakura Lane, Riverside",
        lat: 40.7282,
        lng: -73.9942,
        cuisine: "Japanese",
        rating: 4.5,
        delivery_time_min: 30,
        price_range: "$$$",
        menu: &[
            CategorySeed {
                name: "Ramen",
                items: &[
                    ItemSeed {
                        name: "Tonkotsu Ramen",
                        description: "Pork bone broth, chashu, ajitama",
                        price_cents: 1700,
                        is_veg: false,
                    },
                    ItemSeed {
                        name: "Shoyu Ramen",
                        description: "Soy-based broth, menma, nori",
                        price_cents: 1500,
                        is_veg: false,
                    },
                ],
            },
            CategorySeed {
                name: "Sides",
                items: &[
                    ItemSeed {
                        name: "Vegetable Gyoza",
                        description: "Pan-fried dumplings, ponzu",
                        price_cents: 700,
                        is_veg: true,
                    },
                ],
            },
        ],
    },
];

/// Upsert the demo dataset. Returns counts of rows written.
pub async fn run(store: &Store) -> Result<SeedSummary, StoreError> {
    let mut summary = SeedSummary {
        restaurants: 0,
        categories: 0,
        menu_items: 0,
    };

    for seed in DATASET {
        let restaurant_id = upsert_restaurant(store, seed).await?;
        summary.restaurants += 1;

        for (order, category) in seed.menu.iter().enumerate() {
            let category_id =
                upsert_category(store, &restaurant_id, category.name, order as u32).await?;
            summary.categories += 1;

            for item in category.items {
                upsert_item(store, &restaurant_id, &category_id, item).await?;
                summary.menu_items += 1;
            }
        }
    }

    tracing::info!(
        restaurants = summary.restaurants,
        menu_items = summary.menu_items,
        "seed complete"
    );
    Ok(summary)
}

async fn upsert_restaurant(
    store: &Store,
    seed: &RestaurantSeed,
) -> Result<RestaurantId, StoreError> {
    let existing: Option<Restaurant> = store
        .fetch_optional(&Select::from(Restaurant::TABLE).eq("name", seed.name))
        .await?;

    let row = Restaurant {
        id: existing
            .as_ref()
            .map(|r| r.id.clone())
            .unwrap_or_else(RestaurantId::generate),
        name: seed.name.to_string(),
        address: seed.address.to_string(),
        image_url: None,
        lat: seed.lat,
        lng: seed.lng,
        cuisine: seed.cuisine.to_string(),
        rating: seed.rating,
        delivery_time_min: seed.delivery_time_min,
        price_range: seed.price_range.to_string(),
        is_open: true,
    };

    if existing.is_some() {
        store
            .update(
                Restaurant::TABLE,
                &[nearfood_store::Filter::eq("id", row.id.as_str())],
                &row,
            )
            .await?;
    } else {
        store.insert_value(Restaurant::TABLE, &row).await?;
    }
    Ok(row.id)
}

async fn upsert_category(
    store: &Store,
    restaurant_id: &RestaurantId,
    name: &str,
    display_order: u32,
) -> Result<CategoryId, StoreError> {
    let existing: Option<MenuCategory> = store
        .fetch_optional(
            &Select::from(MenuCategory::TABLE)
                .eq("restaurant_id", restaurant_id.as_str())
                .eq("name", name),
        )
        .await?;

    if let Some(found) = existing {
        return Ok(found.id);
    }

    let row = MenuCategory {
        id: CategoryId::generate(),
        restaurant_id: restaurant_id.clone(),
        name: name.to_string(),
        display_order,
    };
    store.insert_value(MenuCategory::TABLE, &row).await?;
    Ok(row.id)
}

async fn upsert_item(
    store: &Store,
    restaurant_id: &RestaurantId,
    category_id: &CategoryId,
    seed: &ItemSeed,
) -> Result<(), StoreError> {
    let existing: Option<MenuItem> = store
        .fetch_optional(
            &Select::from(MenuItem::TABLE)
                .eq("restaurant_id", restaurant_id.as_str())
                .eq("name", seed.name),
        )
        .await?;

    if let Some(found) = existing {
        // Refresh price and availability; identity stays stable so carts
        // pointing at the item keep working.
        store
            .update(
                MenuItem::TABLE,
                &[nearfood_store::Filter::eq("id", found.id.as_str())],
                &json!({
                    "description": seed.description,
                    "price": seed.price_cents,
                    "is_available": true,
                    "is_veg": seed.is_veg,
                }),
            )
            .await?;
        return Ok(());
    }

    let row = MenuItem {
        id: MenuItemId::generate(),
        restaurant_id: restaurant_id.clone(),
        category_id: Some(category_id.clone()),
        name: seed.name.to_string(),
        description: Some(seed.description.to_string()),
        price: Money::from_cents(seed.price_cents),
        is_available: true,
        is_veg: seed.is_veg,
    };
    store.insert_value(MenuItem::TABLE, &row).await?;
    Ok(())
}
