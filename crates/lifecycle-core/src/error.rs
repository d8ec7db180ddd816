//! Error taxonomy for lifecycle commands.
//!
//! Every rejected command reports exactly one of these typed failures and
//! leaves all state unchanged. Each failure carries a classification so
//! callers can distinguish bad input or wrong state from an actor that is
//! simply not allowed to perform the command.

use lifecycle_storage::StorageError;
use lifecycle_types::{ActorRole, OrderStatus};
use thiserror::Error;

/// Errors that can occur during lifecycle commands.
#[derive(Debug, Error)]
pub enum LifecycleError {
	/// The requested status change is not a legal edge from the current
	/// status.
	#[error("Invalid transition from {from} to {to}")]
	InvalidTransition { from: String, to: String },
	/// The actor's role is not permitted to perform this command.
	#[error("Role {role} is not permitted to {action}")]
	Forbidden { role: ActorRole, action: String },
	/// The order is in a status that disallows opening a dispute or
	/// return against it.
	#[error("Order in status {status} is not eligible for this request")]
	IneligibleOrder { status: OrderStatus },
	/// The order is in a status that disallows this mutation.
	#[error("Order in status {status} does not allow this operation")]
	InvalidState { status: OrderStatus },
	/// A terminal dispute or return transition is missing its required
	/// explanatory text.
	#[error("A resolution text is required for this transition")]
	MissingResolution,
	/// A command that requires a reason was issued without one.
	#[error("A non-empty reason is required")]
	MissingReason,
	/// Refund amount absent, negative, or exceeding the order total.
	#[error("Invalid refund amount: {reason}")]
	InvalidRefundAmount { reason: String },
	/// Cancellation was requested on a terminal order.
	#[error("Order in status {status} can no longer be cancelled")]
	CannotCancel { status: OrderStatus },
	/// An open dispute already exists for this order.
	#[error("Order already has an open dispute: {dispute_id}")]
	DisputeAlreadyOpen { dispute_id: String },
	/// An undecided return request already exists for this order.
	#[error("Order already has a pending return request: {return_id}")]
	ReturnAlreadyRequested { return_id: String },
	/// The order totals do not add up.
	#[error("Order totals are inconsistent")]
	InconsistentTotals,
	/// The order number is already taken.
	#[error("Order number {number} is already in use")]
	DuplicateOrderNumber { number: String },
	/// The referenced order, dispute, or return does not exist.
	#[error("{kind} not found: {id}")]
	NotFound { kind: &'static str, id: String },
	/// Error related to configuration issues.
	#[error("Configuration error: {0}")]
	Configuration(String),
	/// Error from the persistence collaborator.
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
	/// Error reading the system clock.
	#[error("Time error: {0}")]
	Time(String),
}

/// Broad classification of a lifecycle failure.
///
/// UI layers map these to distinct feedback: a client error is actionable
/// by fixing the request, an authorization error is not, and an internal
/// error is neither's fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
	/// Bad input or wrong state.
	Client,
	/// The actor's role lacks permission.
	Authorization,
	/// Storage, configuration, or clock failure.
	Internal,
}

impl LifecycleError {
	/// Classifies this failure for caller feedback.
	pub fn class(&self) -> ErrorClass {
		match self {
			LifecycleError::Forbidden { .. } => ErrorClass::Authorization,
			LifecycleError::Configuration(_)
			| LifecycleError::Storage(_)
			| LifecycleError::Time(_) => ErrorClass::Internal,
			_ => ErrorClass::Client,
		}
	}
}
