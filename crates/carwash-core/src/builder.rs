//! Construction of an [`OrderStore`] from configuration.
//!
//! The storage backend is chosen by name: each entry of
//! `[storage.implementations]` is matched against the supplied factories and
//! the one named by `storage.primary` backs the store.

use crate::OrderStore;
use carwash_config::Config;
use carwash_storage::{StorageError, StorageInterface, StorageService};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while building the order store.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Builder for an [`OrderStore`] backed by a config-selected storage backend.
pub struct OrderStoreBuilder {
	config: Config,
}

impl OrderStoreBuilder {
	/// Creates a new builder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the store using the named storage factories.
	pub fn build<SF>(
		self,
		storage_factories: &HashMap<String, SF>,
	) -> Result<OrderStore, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
	{
		let mut storage_impls = HashMap::new();
		for (name, config) in &self.config.storage.implementations {
			let Some(factory) = storage_factories.get(name) else {
				tracing::warn!(component = "storage", implementation = %name, "No factory registered, skipping");
				continue;
			};
			match factory(config) {
				Ok(implementation) => {
					storage_impls.insert(name.clone(), implementation);
					let is_primary = &self.config.storage.primary == name;
					tracing::info!(component = "storage", implementation = %name, enabled = %is_primary, "Loaded");
				},
				Err(e) => {
					tracing::error!(
						component = "storage",
						implementation = %name,
						error = %e,
						"Failed to create storage implementation"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create storage implementation '{}': {}",
						name, e
					)));
				},
			}
		}

		let primary_storage = &self.config.storage.primary;
		let storage_backend = storage_impls.remove(primary_storage).ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary storage '{}' has no registered implementation",
				primary_storage
			))
		})?;

		Ok(OrderStore::new(Arc::new(StorageService::new(
			storage_backend,
		))))
	}
}
