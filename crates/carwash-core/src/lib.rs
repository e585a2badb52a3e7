//! Core order management for the car-wash service.
//!
//! [`OrderStore`] holds every order for the lifetime of the process and is the
//! only shared mutable state in the service. [`OrderStoreBuilder`] wires it to
//! the storage backend selected in configuration.

pub mod builder;
pub mod store;

pub use builder::{BuilderError, OrderStoreBuilder};
pub use store::{OrderStore, OrderStoreError};
