//! Storage module for the car-wash order service.
//!
//! This module provides the byte-level backend abstraction and a typed service
//! on top of it. Values are JSON-encoded and addressed by `namespace:id` keys.

use async_trait::async_trait;
use carwash_types::ImplementationRegistry;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when a requested item is not found.
	#[error("Not found")]
	NotFound,
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the low-level interface for storage backends.
///
/// Every method is a single atomic operation on the backend. Sequences of
/// calls are not transactional.
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Retrieves raw bytes for the given key.
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

	/// Stores raw bytes, overwriting any previous value.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Deletes the value associated with the given key. Absent keys are a no-op.
	async fn delete(&self, key: &str) -> Result<(), StorageError>;

	/// Overwrites the value of an existing key.
	///
	/// Returns `NotFound` without writing if the key is absent. The presence
	/// check and the write happen as one operation.
	async fn update_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Returns a snapshot of every entry whose key starts with `prefix`.
	async fn list(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StorageError>;
}

/// Type alias for storage factory functions.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples, used to resolve the
/// `storage.primary` setting to a backend.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::memory;

	vec![(memory::Registry::NAME, memory::Registry::factory())]
}

/// High-level storage service that provides typed operations.
///
/// Wraps a backend and handles key construction and JSON encoding.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	/// Creates a new StorageService with the specified backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	fn key(namespace: &str, id: &str) -> String {
		format!("{}:{}", namespace, id)
	}

	/// Stores a serializable value, creating or overwriting it.
	pub async fn store<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend.set_bytes(&Self::key(namespace, id), bytes).await
	}

	/// Retrieves and deserializes a value from storage.
	pub async fn retrieve<T: DeserializeOwned>(
		&self,
		namespace: &str,
		id: &str,
	) -> Result<T, StorageError> {
		let bytes = self.backend.get_bytes(&Self::key(namespace, id)).await?;
		serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
	}

	/// Retrieves and deserializes every value in a namespace.
	///
	/// The result is a snapshot; ordering is not guaranteed.
	pub async fn retrieve_all<T: DeserializeOwned>(
		&self,
		namespace: &str,
	) -> Result<Vec<T>, StorageError> {
		let prefix = format!("{}:", namespace);
		self.backend
			.list(&prefix)
			.await?
			.into_iter()
			.map(|(_, bytes)| {
				serde_json::from_slice(&bytes)
					.map_err(|e| StorageError::Serialization(e.to_string()))
			})
			.collect()
	}

	/// Removes a value from storage.
	pub async fn remove(&self, namespace: &str, id: &str) -> Result<(), StorageError> {
		self.backend.delete(&Self::key(namespace, id)).await
	}

	/// Updates an existing value in storage.
	///
	/// Unlike [`store`](Self::store), returns `NotFound` if the key doesn't exist.
	pub async fn update<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend
			.update_bytes(&Self::key(namespace, id), bytes)
			.await
	}
}
