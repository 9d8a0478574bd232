//! Domain types for the registry.
//!
//! These are validated records separate from any wire or row representation.

pub mod car;
pub mod person;
pub mod session;
pub mod store;
pub mod user;

pub use car::{Car, NewCar};
pub use person::{NewPerson, Person};
pub use session::{CurrentUser, keys as session_keys};
pub use store::{NewStore, Store};
pub use user::{AuthenticatedUser, LoginEvent, UserRecord};
