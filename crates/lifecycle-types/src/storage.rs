//! Storage-related types for the lifecycle system.

use std::str::FromStr;

/// Storage keys for the lifecycle data collections.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
	/// Key for storing order records.
	Orders,
	/// Key for storing dispute records.
	Disputes,
	/// Key for storing return records.
	Returns,
	/// Key for mapping order numbers to order ids.
	OrderByNumber,
}

impl StoreKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StoreKey::Orders => "orders",
			StoreKey::Disputes => "disputes",
			StoreKey::Returns => "returns",
			StoreKey::OrderByNumber => "order_by_number",
		}
	}

	/// Returns an iterator over all StoreKey variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Orders,
			Self::Disputes,
			Self::Returns,
			Self::OrderByNumber,
		]
		.into_iter()
	}
}

impl FromStr for StoreKey {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"orders" => Ok(Self::Orders),
			"disputes" => Ok(Self::Disputes),
			"returns" => Ok(Self::Returns),
			"order_by_number" => Ok(Self::OrderByNumber),
			_ => Err(()),
		}
	}
}

impl From<StoreKey> for &'static str {
	fn from(key: StoreKey) -> Self {
		key.as_str()
	}
}
