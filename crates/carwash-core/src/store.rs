//! Typed order storage.
//!
//! Orders are kept under the `orders` namespace of a [`StorageService`], keyed
//! by their id. Absence is reported as `None`, never as an error.

use carwash_storage::{StorageError, StorageService};
use carwash_types::{Order, OrderStatus, StorageKey};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

/// Errors that can occur during order store operations.
#[derive(Debug, Error)]
pub enum OrderStoreError {
	#[error("Storage error: {0}")]
	Storage(String),
}

impl From<StorageError> for OrderStoreError {
	fn from(err: StorageError) -> Self {
		OrderStoreError::Storage(err.to_string())
	}
}

/// Keyed collection of every order known to the service.
///
/// Single operations are atomic. `update` and `update_status` read and then
/// write without compare-and-swap, so concurrent updates to the same id race
/// and the last write wins. The write only lands if the order still exists,
/// so an update never brings back a deleted order.
pub struct OrderStore {
	storage: Arc<StorageService>,
}

impl OrderStore {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Returns a snapshot of all orders. Ordering is not guaranteed.
	pub async fn list(&self) -> Result<Vec<Order>, OrderStoreError> {
		Ok(self
			.storage
			.retrieve_all(StorageKey::Orders.as_str())
			.await?)
	}

	/// Looks up an order by id.
	pub async fn get(&self, id: Uuid) -> Result<Option<Order>, OrderStoreError> {
		match self
			.storage
			.retrieve(StorageKey::Orders.as_str(), &id.to_string())
			.await
		{
			Ok(order) => Ok(Some(order)),
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(e.into()),
		}
	}

	/// Inserts or overwrites an order at its id.
	///
	/// An order without an id is assigned a fresh one first. Returns the
	/// order as stored.
	#[instrument(skip_all)]
	pub async fn put(&self, mut order: Order) -> Result<Order, OrderStoreError> {
		let id = *order.order_id.get_or_insert_with(Uuid::new_v4);

		self.storage
			.store(StorageKey::Orders.as_str(), &id.to_string(), &order)
			.await?;

		tracing::debug!(order_id = %id, status = %order.order_status, "Stored order");
		Ok(order)
	}

	/// Deletes an order. Removing an absent id is a no-op.
	pub async fn remove(&self, id: Uuid) -> Result<(), OrderStoreError> {
		self.storage
			.remove(StorageKey::Orders.as_str(), &id.to_string())
			.await?;
		tracing::debug!(order_id = %id, "Removed order");
		Ok(())
	}

	/// Returns every order whose status equals `status`.
	pub async fn filter_by_status(
		&self,
		status: OrderStatus,
	) -> Result<Vec<Order>, OrderStoreError> {
		let orders = self.list().await?;
		Ok(orders
			.into_iter()
			.filter(|order| order.order_status == status)
			.collect())
	}

	/// Replaces every mutable field of an existing order with the values in
	/// `details`. Fields left unset in `details` become unset on the order.
	/// The stored id is kept regardless of the id carried by `details`.
	#[instrument(skip(self, details))]
	pub async fn update(
		&self,
		id: Uuid,
		details: Order,
	) -> Result<Option<Order>, OrderStoreError> {
		self.update_with(id, |order| order.replace_details(details))
			.await
	}

	/// Sets the status of an existing order, leaving other fields untouched.
	#[instrument(skip(self))]
	pub async fn update_status(
		&self,
		id: Uuid,
		status: OrderStatus,
	) -> Result<Option<Order>, OrderStoreError> {
		self.update_with(id, |order| order.order_status = status)
			.await
	}

	/// Applies `updater` to the stored order and writes it back.
	async fn update_with<F>(&self, id: Uuid, updater: F) -> Result<Option<Order>, OrderStoreError>
	where
		F: FnOnce(&mut Order),
	{
		let Some(mut order) = self.get(id).await? else {
			return Ok(None);
		};

		updater(&mut order);
		order.order_id = Some(id);

		match self
			.storage
			.update(StorageKey::Orders.as_str(), &id.to_string(), &order)
			.await
		{
			Ok(()) => Ok(Some(order)),
			// Removed between the read and the write
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(e.into()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use carwash_storage::{implementations::memory::MemoryStorage, StorageInterface};
	use std::collections::HashSet;

	/// Backend that deletes every key right after it has been read, so a
	/// concurrent delete always lands between the read and the write of an
	/// update.
	struct DeleteAfterRead {
		inner: MemoryStorage,
	}

	#[async_trait]
	impl StorageInterface for DeleteAfterRead {
		async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
			let bytes = self.inner.get_bytes(key).await?;
			self.inner.delete(key).await?;
			Ok(bytes)
		}

		async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
			self.inner.set_bytes(key, value).await
		}

		async fn update_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
			self.inner.update_bytes(key, value).await
		}

		async fn delete(&self, key: &str) -> Result<(), StorageError> {
			self.inner.delete(key).await
		}

		async fn list(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StorageError> {
			self.inner.list(prefix).await
		}
	}

	fn store() -> OrderStore {
		OrderStore::new(Arc::new(StorageService::new(Box::new(MemoryStorage::new()))))
	}

	#[tokio::test]
	async fn test_put_assigns_missing_id() {
		let store = store();
		let order = Order {
			order_id: None,
			..Order::new("Alice", "555-1000", "ABC123")
		};

		let stored = store.put(order).await.unwrap();
		let id = stored.order_id.expect("id assigned");
		assert_eq!(store.get(id).await.unwrap(), Some(stored));
	}

	#[tokio::test]
	async fn test_generated_ids_do_not_collide() {
		let store = store();
		let mut ids = HashSet::new();
		for _ in 0..50 {
			let stored = store
				.put(Order {
					order_id: None,
					..Order::default()
				})
				.await
				.unwrap();
			assert!(ids.insert(stored.order_id.unwrap()));
		}
		assert_eq!(store.list().await.unwrap().len(), 50);
	}

	#[tokio::test]
	async fn test_get_after_put_returns_equal_value() {
		let store = store();
		let order = Order::new("Bob", "555-2000", "XYZ789");
		let id = order.order_id.unwrap();

		store.put(order.clone()).await.unwrap();
		assert_eq!(store.get(id).await.unwrap(), Some(order));
	}

	#[tokio::test]
	async fn test_put_overwrites_same_id() {
		let store = store();
		let mut order = Order::new("Bob", "555-2000", "XYZ789");
		let id = order.order_id.unwrap();
		store.put(order.clone()).await.unwrap();

		order.user_name = Some("Robert".into());
		store.put(order).await.unwrap();

		let all = store.list().await.unwrap();
		assert_eq!(all.len(), 1);
		assert_eq!(all[0].user_name.as_deref(), Some("Robert"));
		assert_eq!(all[0].order_id, Some(id));
	}

	#[tokio::test]
	async fn test_remove_then_get_is_absent() {
		let store = store();
		let order = store.put(Order::new("Carol", "555-3000", "CAR1")).await.unwrap();
		let id = order.order_id.unwrap();

		store.remove(id).await.unwrap();
		assert_eq!(store.get(id).await.unwrap(), None);

		// Absent id is a no-op
		store.remove(id).await.unwrap();
		store.remove(Uuid::new_v4()).await.unwrap();
	}

	#[tokio::test]
	async fn test_filter_by_status() {
		let store = store();
		let pending = store.put(Order::new("A", "1", "P1")).await.unwrap();
		let mut done = Order::new("B", "2", "P2");
		done.order_status = OrderStatus::Completed;
		let done = store.put(done).await.unwrap();

		assert_eq!(
			store.filter_by_status(OrderStatus::Pending).await.unwrap(),
			vec![pending]
		);
		assert_eq!(
			store.filter_by_status(OrderStatus::Completed).await.unwrap(),
			vec![done]
		);
		assert!(store
			.filter_by_status(OrderStatus::Cancelled)
			.await
			.unwrap()
			.is_empty());
	}

	#[tokio::test]
	async fn test_update_replaces_all_mutable_fields() {
		let store = store();
		let original = store.put(Order::new("Dave", "555-4000", "DAV1")).await.unwrap();
		let id = original.order_id.unwrap();

		let details = Order {
			order_id: Some(Uuid::new_v4()),
			user_name: Some("David".into()),
			phone_number: None,
			car_license_number: None,
			order_status: OrderStatus::InProgress,
		};
		let updated = store.update(id, details).await.unwrap().unwrap();

		assert_eq!(updated.order_id, Some(id));
		assert_eq!(updated.user_name.as_deref(), Some("David"));
		assert!(updated.phone_number.is_none());
		assert!(updated.car_license_number.is_none());
		assert_eq!(updated.order_status, OrderStatus::InProgress);
		assert_eq!(store.get(id).await.unwrap(), Some(updated));
	}

	#[tokio::test]
	async fn test_update_missing_order() {
		let store = store();
		let result = store.update(Uuid::new_v4(), Order::default()).await.unwrap();
		assert!(result.is_none());
		assert!(store.list().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_update_status_only_touches_status() {
		let store = store();
		let original = store.put(Order::new("Eve", "555-5000", "EVE1")).await.unwrap();
		let id = original.order_id.unwrap();

		let updated = store
			.update_status(id, OrderStatus::Cancelled)
			.await
			.unwrap()
			.unwrap();

		assert_eq!(updated.order_status, OrderStatus::Cancelled);
		assert_eq!(updated.user_name, original.user_name);
		assert_eq!(updated.phone_number, original.phone_number);
		assert_eq!(updated.car_license_number, original.car_license_number);

		assert!(store
			.update_status(Uuid::new_v4(), OrderStatus::Completed)
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn test_update_racing_delete_keeps_order_removed() {
		let store = OrderStore::new(Arc::new(StorageService::new(Box::new(
			DeleteAfterRead {
				inner: MemoryStorage::new(),
			},
		))));
		let order = store.put(Order::new("Gus", "555-7000", "GUS1")).await.unwrap();
		let id = order.order_id.unwrap();

		let updated = store.update_status(id, OrderStatus::Completed).await.unwrap();
		assert!(updated.is_none());
		assert!(store.list().await.unwrap().is_empty());

		let order = store.put(Order::new("Hal", "555-8000", "HAL1")).await.unwrap();
		let id = order.order_id.unwrap();

		let updated = store.update(id, Order::default()).await.unwrap();
		assert!(updated.is_none());
		assert!(store.list().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_concurrent_status_updates_last_write_wins() {
		let store = Arc::new(store());
		let order = store.put(Order::new("Fay", "555-6000", "FAY1")).await.unwrap();
		let id = order.order_id.unwrap();

		let handles: Vec<_> = [OrderStatus::InProgress, OrderStatus::Completed]
			.into_iter()
			.map(|status| {
				let store = Arc::clone(&store);
				tokio::spawn(async move { store.update_status(id, status).await })
			})
			.collect();
		for handle in handles {
			assert!(handle.await.unwrap().unwrap().is_some());
		}

		let final_status = store.get(id).await.unwrap().unwrap().order_status;
		assert!(matches!(
			final_status,
			OrderStatus::InProgress | OrderStatus::Completed
		));
	}
}
