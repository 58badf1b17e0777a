//! Builder API for configuring account stores.
//!
//! Stores can be created directly with `AccountStore::new`, but the builder
//! is the place to override the initial balance, history limit, storage
//! key, starting persistence toggle, and the time and id sources.

pub mod error;
pub mod store;

pub use error::BuildError;
pub use store::AccountStoreBuilder;
