//! Car-wash order API implementation.
//!
//! Each function maps one endpoint onto a single [`OrderStore`] call and turns
//! absence into [`APIError::NotFound`].

use carwash_core::{OrderStore, OrderStoreError};
use carwash_types::{APIError, Order, OrderStatus};
use tracing::{info, warn};
use uuid::Uuid;

fn storage_failure(operation: &str, err: OrderStoreError) -> APIError {
	warn!("{} failed: {}", operation, err);
	APIError::InternalServerError {
		error_type: "STORAGE_ERROR".to_string(),
		message: err.to_string(),
	}
}

/// Returns every order.
pub async fn list_orders(store: &OrderStore) -> Result<Vec<Order>, APIError> {
	store
		.list()
		.await
		.map_err(|e| storage_failure("Listing orders", e))
}

/// Returns the order with the given id.
pub async fn get_order(store: &OrderStore, id: Uuid) -> Result<Order, APIError> {
	store
		.get(id)
		.await
		.map_err(|e| storage_failure("Order retrieval", e))?
		.ok_or(APIError::NotFound)
}

/// Stores a new order, assigning an id if the body carried none.
pub async fn create_order(store: &OrderStore, order: Order) -> Result<Order, APIError> {
	let created = store
		.put(order)
		.await
		.map_err(|e| storage_failure("Order creation", e))?;

	if let Some(id) = created.order_id {
		info!(order_id = %id, "Created order");
	}
	Ok(created)
}

/// Overwrites every mutable field of an existing order.
pub async fn update_order(store: &OrderStore, id: Uuid, order: Order) -> Result<Order, APIError> {
	let updated = store
		.update(id, order)
		.await
		.map_err(|e| storage_failure("Order update", e))?
		.ok_or(APIError::NotFound)?;

	info!(order_id = %id, "Updated order");
	Ok(updated)
}

/// Changes only the status of an existing order.
pub async fn update_order_status(
	store: &OrderStore,
	id: Uuid,
	status: OrderStatus,
) -> Result<Order, APIError> {
	let updated = store
		.update_status(id, status)
		.await
		.map_err(|e| storage_failure("Status update", e))?
		.ok_or(APIError::NotFound)?;

	info!(order_id = %id, status = %status, "Updated order status");
	Ok(updated)
}

/// Deletes an existing order.
///
/// Presence is checked before removal; the two calls are not transactional.
pub async fn delete_order(store: &OrderStore, id: Uuid) -> Result<(), APIError> {
	get_order(store, id).await?;

	store
		.remove(id)
		.await
		.map_err(|e| storage_failure("Order deletion", e))?;

	info!(order_id = %id, "Deleted order");
	Ok(())
}

/// Returns every order in the given status.
pub async fn orders_by_status(
	store: &OrderStore,
	status: OrderStatus,
) -> Result<Vec<Order>, APIError> {
	store
		.filter_by_status(status)
		.await
		.map_err(|e| storage_failure("Status filter", e))
}
