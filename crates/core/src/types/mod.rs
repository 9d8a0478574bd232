//! Newtype wrappers for domain values.
//!
//! Each module provides a validated wrapper so raw strings and integers
//! cannot be mixed up between entity types.

pub mod email;
pub mod id;
pub mod username;
pub mod vin;

pub use email::{Email, EmailError};
pub use id::{PersonId, StoreId};
pub use username::{Username, UsernameError};
pub use vin::{Vin, VinError};
