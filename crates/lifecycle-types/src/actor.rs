//! Actor types for lifecycle commands.
//!
//! Every lifecycle command carries the identity and role of the party
//! attempting it. Roles are supplied by an external authentication
//! collaborator on each call; the lifecycle core trusts the role it is
//! given and performs no identity verification of its own.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role under which a lifecycle command is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActorRole {
	/// The customer who placed the order.
	Buyer,
	/// The artisan fulfilling the order.
	Seller,
	/// Marketplace staff with elevated permissions.
	Admin,
	/// Automated collaborators such as payment or delivery confirmation.
	System,
}

impl fmt::Display for ActorRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ActorRole::Buyer => write!(f, "buyer"),
			ActorRole::Seller => write!(f, "seller"),
			ActorRole::Admin => write!(f, "admin"),
			ActorRole::System => write!(f, "system"),
		}
	}
}

/// The party attempting a lifecycle command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
	/// Role the command is issued under.
	pub role: ActorRole,
	/// Identifier of the acting user. None for system-triggered commands.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
}

impl Actor {
	/// Creates an actor for a known user identity.
	pub fn new(role: ActorRole, id: impl Into<String>) -> Self {
		Self {
			role,
			id: Some(id.into()),
		}
	}

	/// Creates the anonymous system actor used for automated transitions.
	pub fn system() -> Self {
		Self {
			role: ActorRole::System,
			id: None,
		}
	}
}

impl fmt::Display for Actor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.id {
			Some(id) => write!(f, "{}:{}", self.role, id),
			None => write!(f, "{}", self.role),
		}
	}
}
