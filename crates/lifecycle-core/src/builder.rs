//! Builder for constructing a LifecycleManager from configuration.
//!
//! The builder resolves the storage backend named in the configuration
//! through registered factories, validates the backend's configuration
//! table against its own schema, and wires the resulting storage service
//! into a manager.

use crate::{LifecycleError, LifecycleManager};
use lifecycle_config::Config;
use lifecycle_storage::{StorageFactory, StorageService};
use std::collections::HashMap;
use std::sync::Arc;

/// Builder wiring a [`Config`] and registered storage factories into a
/// [`LifecycleManager`].
pub struct LifecycleBuilder {
	config: Config,
	storage_factories: HashMap<String, StorageFactory>,
}

impl LifecycleBuilder {
	/// Creates a new builder with the given configuration and no
	/// registered factories.
	pub fn new(config: Config) -> Self {
		Self {
			config,
			storage_factories: HashMap::new(),
		}
	}

	/// Registers a storage factory under the name used in configuration.
	pub fn with_storage_factory(mut self, name: &str, factory: StorageFactory) -> Self {
		self.storage_factories.insert(name.to_string(), factory);
		self
	}

	/// Registers all bundled storage implementations.
	pub fn with_bundled_storage(mut self) -> Self {
		for (name, factory) in lifecycle_storage::get_all_implementations() {
			self.storage_factories.insert(name.to_string(), factory);
		}
		self
	}

	/// Builds the LifecycleManager using the configured factories.
	///
	/// This method:
	/// 1. Resolves the backend named in the configuration to a factory
	/// 2. Creates the backend and validates its configuration table
	///    against the backend's schema
	/// 3. Returns a manager over the resulting storage service
	pub fn build(self) -> Result<LifecycleManager, LifecycleError> {
		let backend_name = &self.config.storage.backend;
		let factory = self.storage_factories.get(backend_name).ok_or_else(|| {
			LifecycleError::Configuration(format!("Unknown storage backend '{}'", backend_name))
		})?;

		let backend = factory(&self.config.storage.config).map_err(|e| {
			tracing::error!(
				component = "storage",
				implementation = %backend_name,
				error = %e,
				"Failed to create storage backend"
			);
			LifecycleError::Configuration(format!(
				"Failed to create storage backend '{}': {}",
				backend_name, e
			))
		})?;

		backend
			.config_schema()
			.validate(&self.config.storage.config)
			.map_err(|e| {
				LifecycleError::Configuration(format!(
					"Invalid configuration for storage backend '{}': {}",
					backend_name, e
				))
			})?;
		tracing::info!(component = "storage", implementation = %backend_name, "Loaded");

		Ok(LifecycleManager::new(Arc::new(StorageService::new(backend))))
	}
}
