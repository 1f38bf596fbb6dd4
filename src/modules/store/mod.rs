//! Record store for question/category tagging.
//!
//! [`TagStore`] is the seam between the tagging services and persistence.
//! [`PgTagStore`] runs against PostgreSQL; the in-memory store backs tests.

mod error;
mod postgres;
mod traits;

#[cfg(test)]
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use postgres::PgTagStore;
pub use traits::{TagStore, TagTransaction};
