//! Storage-related types for the car-wash service.

/// Storage namespaces for different data collections.
///
/// Replaces string literals in storage calls with typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Namespace holding order records
	Orders,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Orders => "orders",
		}
	}
}
