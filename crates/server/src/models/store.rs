//! Retail store domain types.

use serde::{Deserialize, Serialize};

use motorpool_core::StoreId;

/// A registered retail store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Store {
    /// Store-assigned unique ID.
    pub id: StoreId,
    pub retailer: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

/// A store about to be inserted; the backing store assigns the ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStore {
    pub retailer: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl NewStore {
    /// Attach a store-assigned ID, producing the persisted record.
    #[must_use]
    pub fn into_store(self, id: StoreId) -> Store {
        Store {
            id,
            retailer: self.retailer,
            phone: self.phone,
            address: self.address,
            city: self.city,
        }
    }
}
