//! Endpoint implementations, one module per resource.

pub mod order;
