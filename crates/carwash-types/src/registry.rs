//! Registry trait for config-selected implementations.

/// Base trait for implementation registries.
///
/// Each pluggable implementation module provides a `Registry` struct that
/// declares the name it is referenced by in configuration and the factory
/// that builds it.
pub trait ImplementationRegistry {
	/// Name used in configuration files, e.g. "memory" for
	/// `[storage.implementations.memory]`.
	const NAME: &'static str;

	/// Factory function type this implementation provides.
	type Factory;

	/// Returns the factory function for this implementation.
	fn factory() -> Self::Factory;
}
