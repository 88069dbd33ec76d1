//! Saved delivery addresses.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use nearfood_commerce::checkout::{AddressDraft, AddressService, UserAddress};
use nearfood_commerce::AddressId;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::extract::AuthUser;
use crate::state::AppState;

/// Partial update body; absent fields keep their current value.
#[derive(Deserialize)]
pub(crate) struct AddressPatch {
    label: Option<String>,
    address_line1: Option<String>,
    #[serde(default, deserialize_with = "some_option")]
    address_line2: Option<Option<String>>,
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    #[serde(default, deserialize_with = "some_option")]
    phone: Option<Option<String>>,
    is_default: Option<bool>,
}

// Distinguishes "field absent" from "field set to null" for the two
// nullable columns.
fn some_option<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Some(Option::deserialize(de)?))
}

impl AddressPatch {
    fn apply(self, current: UserAddress) -> AddressDraft {
        AddressDraft {
            label: self.label.unwrap_or(current.label),
            address_line1: self.address_line1.unwrap_or(current.address_line1),
            address_line2: self.address_line2.unwrap_or(current.address_line2),
            city: self.city.unwrap_or(current.city),
            state: self.state.unwrap_or(current.state),
            postal_code: self.postal_code.unwrap_or(current.postal_code),
            country: self.country.unwrap_or(current.country),
            phone: self.phone.unwrap_or(current.phone),
            is_default: self.is_default.unwrap_or(current.is_default),
        }
    }
}

pub(crate) async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let addresses = AddressService::new(state.store.clone())
        .list(&user.user_id())
        .await?;
    Ok(Json(json!({ "data": addresses })))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(draft): Json<AddressDraft>,
) -> Result<(StatusCode, Json<UserAddress>), AppError> {
    let address = AddressService::new(state.store.clone())
        .create(&user.user_id(), draft)
        .await?;
    Ok((StatusCode::CREATED, Json(address)))
}

pub(crate) async fn show(
    State(state): State<AppState>,
    user: AuthUser,
    Path(address_id): Path<String>,
) -> Result<Json<UserAddress>, AppError> {
    let address = AddressService::new(state.store.clone())
        .get(&user.user_id(), &AddressId::new(address_id))
        .await?;
    Ok(Json(address))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(address_id): Path<String>,
    Json(patch): Json<AddressPatch>,
) -> Result<Json<UserAddress>, AppError> {
    let service = AddressService::new(state.store.clone());
    let user_id = user.user_id();
    let address_id = AddressId::new(address_id);

    let current = service.get(&user_id, &address_id).await?;
    let updated = service
        .update(&user_id, &address_id, patch.apply(current))
        .await?;
    Ok(Json(updated))
}

pub(crate) async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(address_id): Path<String>,
) -> Result<StatusCode, AppError> {
    AddressService::new(state.store.clone())
        .delete(&user.user_id(), &AddressId::new(address_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
