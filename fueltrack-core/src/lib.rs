//! FuelTrack Core Library
//!
//! Meal records, their JSON-file stores, the nutrition aggregator and the
//! session gate that scopes every store access to one identity.

pub mod auth;
pub mod journal;
pub mod models;
pub mod session;
pub mod stats;
pub mod store;

pub use auth::{AuthError, AuthGate};
pub use journal::{Dashboard, Journal};
pub use models::{coerce_amount, MealEntry, MealRecord};
pub use session::{Identity, SessionState, SessionStore};
pub use stats::{aggregate, DailyTotal, Stats};
pub use store::{MealStore, StoreError, UserStore, UserStoreError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
