//! File-based storage backend for the lifecycle system.
//!
//! Each record is stored as one JSON file under
//! `<storage_path>/<namespace>/<id>.json`. Writes go to a temporary file
//! that is renamed into place, so a record is always observed either in
//! its previous or its new state. An advisory lock on the storage
//! directory prevents two processes from sharing the same path.

use crate::{StorageError, StorageFactory, StorageInterface, StorageRegistry};
use async_trait::async_trait;
use fs2::FileExt;
use lifecycle_types::{ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the advisory lock file inside the storage directory.
const LOCK_FILE: &str = ".lifecycle.lock";

/// File-based storage implementation.
pub struct FileStorage {
	/// Root directory holding one subdirectory per namespace.
	base_path: PathBuf,
	/// Advisory lock held for the lifetime of this backend.
	_lock: File,
}

impl FileStorage {
	/// Creates a new FileStorage rooted at the given directory.
	///
	/// The directory is created if missing. Fails if another process
	/// already holds the lock on the same directory.
	pub fn new(base_path: impl AsRef<Path>) -> Result<Self, StorageError> {
		let base_path = base_path.as_ref().to_path_buf();
		std::fs::create_dir_all(&base_path)
			.map_err(|e| StorageError::Backend(format!("Cannot create storage dir: {}", e)))?;

		let lock = OpenOptions::new()
			.create(true)
			.truncate(false)
			.write(true)
			.open(base_path.join(LOCK_FILE))
			.map_err(|e| StorageError::Backend(format!("Cannot open lock file: {}", e)))?;
		lock.try_lock_exclusive().map_err(|_| {
			StorageError::Backend(format!(
				"Storage directory {} is locked by another process",
				base_path.display()
			))
		})?;

		tracing::debug!(path = %base_path.display(), "File storage initialized");
		Ok(Self {
			base_path,
			_lock: lock,
		})
	}

	/// Resolves a `namespace:id` key to its on-disk path.
	fn path_for(&self, key: &str) -> PathBuf {
		let (namespace, id) = key.split_once(':').unwrap_or(("default", key));
		self.base_path
			.join(sanitize(namespace))
			.join(format!("{}.json", sanitize(id)))
	}
}

/// Replaces path-hostile characters so ids and order numbers are safe as
/// file names.
fn sanitize(component: &str) -> String {
	component
		.chars()
		.map(|c| {
			if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
				c
			} else {
				'_'
			}
		})
		.collect()
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.path_for(key);
		match fs::read(&path).await {
			Ok(bytes) => Ok(bytes),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.path_for(key);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		// Write-then-rename keeps the record readable at all times.
		let tmp = path.with_extension("json.tmp");
		fs::write(&tmp, value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		fs::rename(&tmp, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let path = self.path_for(key);
		match fs::remove_file(&path).await {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let path = self.path_for(key);
		fs::try_exists(&path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(vec![Field::new("storage_path", FieldType::String)], vec![]);
		schema.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: directory holding the stored records (required)
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.ok_or_else(|| StorageError::Configuration("storage_path is required".into()))?;

	Ok(Box::new(FileStorage::new(storage_path)?))
}

/// Registry entry for the file backend.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn roundtrip_and_delete() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path()).unwrap();

		let key = "orders:ord-7";
		storage
			.set_bytes(key, br#"{"status":"shipped"}"#.to_vec())
			.await
			.unwrap();
		assert!(storage.exists(key).await.unwrap());
		assert_eq!(
			storage.get_bytes(key).await.unwrap(),
			br#"{"status":"shipped"}"#.to_vec()
		);

		storage.delete(key).await.unwrap();
		assert!(matches!(
			storage.get_bytes(key).await,
			Err(StorageError::NotFound)
		));
	}

	#[tokio::test]
	async fn keys_with_separators_stay_distinct() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path()).unwrap();

		storage
			.set_bytes("order_by_number:ORD-2024-0001", b"id-1".to_vec())
			.await
			.unwrap();
		storage
			.set_bytes("order_by_number:ORD-2024-0002", b"id-2".to_vec())
			.await
			.unwrap();

		assert_eq!(
			storage
				.get_bytes("order_by_number:ORD-2024-0001")
				.await
				.unwrap(),
			b"id-1".to_vec()
		);
	}

	#[test]
	fn directory_lock_is_exclusive() {
		let dir = tempfile::tempdir().unwrap();
		let _first = FileStorage::new(dir.path()).unwrap();
		assert!(FileStorage::new(dir.path()).is_err());
	}
}
