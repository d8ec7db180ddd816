//! Registry trait for self-registering implementations.
//!
//! Pluggable backends (currently the storage implementations) register
//! themselves with the configuration name they answer to and a factory
//! function for constructing them.

/// Base trait for implementation registries.
///
/// Each backend module must provide a Registry struct implementing this
/// trait so the builder can resolve the name used in configuration files
/// to a factory, for example "memory" for storage.backend = "memory".
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
