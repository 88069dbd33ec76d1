//! Saved delivery addresses, with a single default per user.

use nearfood_store::{Filter, Select, Store, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::CommerceError;
use crate::ids::{AddressId, UserId};

/// A saved delivery address row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAddress {
    pub id: AddressId,
    pub user_id: UserId,
    pub label: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub is_default: bool,
    pub created_at: i64,
}

fn default_country() -> String {
    "US".to_string()
}

impl UserAddress {
    pub const TABLE: &'static str = "user_addresses";
}

/// Caller-supplied address fields, before ownership and id are attached.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressDraft {
    pub label: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl AddressDraft {
    fn validate(&self) -> Result<(), CommerceError> {
        for (field, value) in [
            ("label", &self.label),
            ("address_line1", &self.address_line1),
            ("city", &self.city),
            ("state", &self.state),
            ("postal_code", &self.postal_code),
        ] {
            if value.trim().is_empty() {
                return Err(CommerceError::Validation(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

/// Address CRUD scoped to one user. Every lookup filters by `user_id`,
/// so another user's address id behaves as if it did not exist.
#[derive(Clone)]
pub struct AddressService {
    store: Store,
}

impl AddressService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All addresses for the user, default first, then newest first.
    pub async fn list(&self, user_id: &UserId) -> Result<Vec<UserAddress>, CommerceError> {
        let addresses = self
            .store
            .fetch_all(
                &Select::from(UserAddress::TABLE)
                    .eq("user_id", user_id.as_str())
                    .order_desc("is_default")
                    .order_desc("created_at"),
            )
            .await?;
        Ok(addresses)
    }

    pub async fn get(
        &self,
        user_id: &UserId,
        address_id: &AddressId,
    ) -> Result<UserAddress, CommerceError> {
        let address = self
            .store
            .fetch_one(
                &Select::from(UserAddress::TABLE)
                    .eq("id", address_id.as_str())
                    .eq("user_id", user_id.as_str()),
            )
            .await?;
        Ok(address)
    }

    /// Save a new address. The user's first address is always the
    /// default; a later address marked default demotes the previous one.
    pub async fn create(
        &self,
        user_id: &UserId,
        draft: AddressDraft,
    ) -> Result<UserAddress, CommerceError> {
        draft.validate()?;

        let existing = self
            .store
            .count(UserAddress::TABLE, &[Filter::eq("user_id", user_id.as_str())])
            .await?;
        let is_default = draft.is_default || existing == 0;
        if is_default && existing > 0 {
            self.clear_default(user_id).await?;
        }

        let address = UserAddress {
            id: AddressId::generate(),
            user_id: user_id.clone(),
            label: draft.label,
            address_line1: draft.address_line1,
            address_line2: draft.address_line2,
            city: draft.city,
            state: draft.state,
            postal_code: draft.postal_code,
            country: draft.country,
            phone: draft.phone,
            is_default,
            created_at: super::order::current_timestamp(),
        };
        let stored = self.store.insert_as(UserAddress::TABLE, &address).await?;
        Ok(stored)
    }

    /// Replace an address's fields. Ownership is checked first, so an
    /// id belonging to another user reports not-found.
    pub async fn update(
        &self,
        user_id: &UserId,
        address_id: &AddressId,
        draft: AddressDraft,
    ) -> Result<UserAddress, CommerceError> {
        draft.validate()?;
        let current = self.get(user_id, address_id).await?;

        if draft.is_default && !current.is_default {
            self.clear_default(user_id).await?;
        }
        // Demoting the only default leaves the user without one, which
        // is allowed; the next list call simply has no default row.

        self.store
            .update(
                UserAddress::TABLE,
                &[
                    Filter::eq("id", address_id.as_str()),
                    Filter::eq("user_id", user_id.as_str()),
                ],
                &json!({
                    "label": draft.label,
                    "address_line1": draft.address_line1,
                    "address_line2": draft.address_line2,
                    "city": draft.city,
                    "state": draft.state,
                    "postal_code": draft.postal_code,
                    "country": draft.country,
                    "phone": draft.phone,
                    "is_default": draft.is_default,
                }),
            )
            .await?;
        self.get(user_id, address_id).await
    }

    pub async fn delete(
        &self,
        user_id: &UserId,
        address_id: &AddressId,
    ) -> Result<(), CommerceError> {
        let deleted = self
            .store
            .delete(
                UserAddress::TABLE,
                &[
                    Filter::eq("id", address_id.as_str()),
                    Filter::eq("user_id", user_id.as_str()),
                ],
            )
            .await?;
        if deleted == 0 {
            return Err(CommerceError::Store(StoreError::NotFound));
        }
        Ok(())
    }

    async fn clear_default(&self, user_id: &UserId) -> Result<(), CommerceError> {
        self.store
            .update(
                UserAddress::TABLE,
                &[
                    Filter::eq("user_id", user_id.as_str()),
                    Filter::eq("is_default", true),
                ],
                &json!({ "is_default": false }),
            )
            .await?;
        Ok(())
    }
}
