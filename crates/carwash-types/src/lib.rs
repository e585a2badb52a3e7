//! Common types module for the car-wash order service.
//!
//! This module defines the core data types shared by the storage, core and
//! service crates, so that the wire format of an order is declared in exactly
//! one place.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Order record and lifecycle status.
pub mod order;
/// Registry trait for named, config-selected implementations.
pub mod registry;
/// Storage namespaces.
pub mod storage;

pub use api::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use storage::*;
