//! Person domain types.

use serde::{Deserialize, Serialize};

use motorpool_core::{PersonId, Vin};

/// A registered person.
///
/// Optional fields hold `None` when the record was created without them;
/// blank form input never reaches this type (see `motorpool_core::forms`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    /// Store-assigned unique ID.
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    /// Reference to a registered car, if this person owns one.
    pub vin: Option<Vin>,
}

/// A person about to be inserted; the store assigns the ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub vin: Option<Vin>,
}

impl NewPerson {
    /// Attach a store-assigned ID, producing the persisted record.
    #[must_use]
    pub fn into_person(self, id: PersonId) -> Person {
        Person {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            address: self.address,
            city: self.city,
            vin: self.vin,
        }
    }
}
