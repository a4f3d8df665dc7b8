pub mod db;
pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{ProjectStore, StoreHealth, Totals};
