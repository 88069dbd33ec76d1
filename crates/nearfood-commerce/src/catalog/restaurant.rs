//! Restaurant records.

use serde::{Deserialize, Serialize};

use crate::ids::RestaurantId;

/// A restaurant listed on the storefront.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub cuisine: String,
    pub rating: f64,
    /// Estimated delivery time in minutes.
    pub delivery_time_min: u32,
    /// Rough price tier, e.g. `$$`.
    pub price_range: String,
    pub is_open: bool,
}

impl Restaurant {
    pub const TABLE: &'static str = "restaurants";
}
