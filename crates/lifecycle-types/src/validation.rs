//! Configuration validation for backend configuration tables.
//!
//! Storage backends accept a raw TOML table; this module lets each backend
//! declare which fields that table must or may contain so misconfiguration
//! is caught before the backend is constructed.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// Error that occurs when a required field is missing.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// Error that occurs when a field has an invalid value.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// Error that occurs when a field type is incorrect.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

/// Expected type of a configuration field.
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
	/// A string value.
	String,
	/// An integer value.
	Integer,
	/// A boolean value.
	Boolean,
}

impl FieldType {
	fn name(&self) -> &'static str {
		match self {
			FieldType::String => "string",
			FieldType::Integer => "integer",
			FieldType::Boolean => "boolean",
		}
	}

	fn matches(&self, value: &toml::Value) -> bool {
		match self {
			FieldType::String => value.is_str(),
			FieldType::Integer => value.is_integer(),
			FieldType::Boolean => value.is_bool(),
		}
	}
}

/// A named field in a backend configuration table.
#[derive(Debug)]
pub struct Field {
	pub name: &'static str,
	pub field_type: FieldType,
}

impl Field {
	/// Creates a new field with the given name and expected type.
	pub fn new(name: &'static str, field_type: FieldType) -> Self {
		Self { name, field_type }
	}
}

/// Required and optional field sets for one backend's configuration table.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	/// Creates a new schema with required and optional fields.
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates a TOML value against this schema.
	///
	/// Checks that the value is a table, that all required fields are
	/// present, and that every declared field that is present has the
	/// expected type.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.to_string()))?;
			check_field_type(field, value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(field.name) {
				check_field_type(field, value)?;
			}
		}

		Ok(())
	}
}

fn check_field_type(field: &Field, value: &toml::Value) -> Result<(), ValidationError> {
	if !field.field_type.matches(value) {
		return Err(ValidationError::TypeMismatch {
			field: field.name.to_string(),
			expected: field.field_type.name().to_string(),
			actual: value.type_str().to_string(),
		});
	}
	Ok(())
}

/// Trait defining a configuration schema that can validate TOML values.
///
/// Each storage backend returns its schema through
/// `StorageInterface::config_schema` so the builder can vet the backend's
/// configuration table before constructing it.
pub trait ConfigSchema: Send + Sync {
	/// Validates a TOML configuration value against this schema.
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}
