//! Car domain types.

use serde::{Deserialize, Serialize};

use motorpool_core::Vin;

/// A registered car.
///
/// The VIN is the user-supplied primary key; many people may reference the
/// same car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Car {
    pub vin: Vin,
    pub make: String,
    pub model: String,
    pub year: i32,
}

/// A car about to be inserted.
///
/// Identical to [`Car`] because the primary key is caller-supplied; the
/// separate type keeps insert call sites honest about intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCar {
    pub vin: Vin,
    pub make: String,
    pub model: String,
    pub year: i32,
}

impl From<NewCar> for Car {
    fn from(new: NewCar) -> Self {
        Self {
            vin: new.vin,
            make: new.make,
            model: new.model,
            year: new.year,
        }
    }
}
