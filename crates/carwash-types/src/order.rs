//! Order types for the car-wash service.
//!
//! An order is a single wash request: who asked for it, how to reach them,
//! which car it is for, and where it sits in its lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle stage of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
	/// Accepted but not yet started.
	#[default]
	Pending,
	/// Car is being washed.
	InProgress,
	/// Wash finished.
	Completed,
	/// Order was called off.
	Cancelled,
}

impl OrderStatus {
	/// Returns the wire representation of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "PENDING",
			OrderStatus::InProgress => "IN_PROGRESS",
			OrderStatus::Completed => "COMPLETED",
			OrderStatus::Cancelled => "CANCELLED",
		}
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A car-wash order.
///
/// Missing fields fall back to [`Order::default`] during deserialization, so a
/// request body without `orderId` arrives with a freshly generated id and one
/// without `orderStatus` arrives as pending. An explicit `"orderId": null`
/// leaves the id unset; the order store assigns one before insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
	/// Unique identifier, also the order's key in storage.
	pub order_id: Option<Uuid>,
	/// Customer name.
	pub user_name: Option<String>,
	/// Customer phone number.
	pub phone_number: Option<String>,
	/// License plate of the car to be washed.
	pub car_license_number: Option<String>,
	/// Current lifecycle stage.
	pub order_status: OrderStatus,
}

impl Default for Order {
	fn default() -> Self {
		Self {
			order_id: Some(Uuid::new_v4()),
			user_name: None,
			phone_number: None,
			car_license_number: None,
			order_status: OrderStatus::Pending,
		}
	}
}

impl Order {
	/// Creates a pending order with a fresh id.
	pub fn new(
		user_name: impl Into<String>,
		phone_number: impl Into<String>,
		car_license_number: impl Into<String>,
	) -> Self {
		Self {
			user_name: Some(user_name.into()),
			phone_number: Some(phone_number.into()),
			car_license_number: Some(car_license_number.into()),
			..Self::default()
		}
	}

	/// Overwrites every mutable field with the values from `other`.
	///
	/// Fields that are `None` in `other` become `None` here. The id is kept.
	pub fn replace_details(&mut self, other: Order) {
		self.user_name = other.user_name;
		self.phone_number = other.phone_number;
		self.car_license_number = other.car_license_number;
		self.order_status = other.order_status;
	}
}
