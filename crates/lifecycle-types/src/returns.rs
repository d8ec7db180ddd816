//! Return sub-lifecycle types.
//!
//! A return request is filed by a buyer on a delivered order and moves
//! through seller/admin approval to physical return and refund. The refund
//! amount, once set, must stay within the bounds of the parent order total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A return request filed against a delivered order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Return {
	/// Unique identifier for this return request.
	pub id: String,
	/// Identifier of the order being returned.
	pub order_id: String,
	/// Identifier of the buyer who requested the return.
	pub requester: String,
	/// Enumerated reason for the return.
	pub reason: ReturnReason,
	/// Free-text description of the problem.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// References to supporting evidence, e.g. image URLs.
	#[serde(default)]
	pub evidence: Vec<String>,
	/// Current status of the return request.
	pub status: ReturnStatus,
	/// Refund amount, set before the refund is processed.
	/// Must satisfy `0 <= amount <= order.total`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub refund_amount: Option<Decimal>,
	/// Note accompanying the approval, rejection, or refund decision.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub refund_reason: Option<String>,
	/// Identifier of the seller or admin who decided the request.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub approved_by: Option<String>,
	/// Timestamp when this return was created.
	pub created_at: u64,
	/// Timestamp when this return was last updated.
	pub updated_at: u64,
}

/// Enumerated return reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReturnReason {
	/// The product is defective.
	Defective,
	/// The wrong item was delivered.
	WrongItem,
	/// The product does not match its listing.
	NotAsDescribed,
	/// The buyer changed their mind.
	ChangedMind,
	/// Anything else, explained in the description.
	Other,
}

/// Status of a return request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReturnStatus {
	/// Filed and awaiting a decision.
	Requested,
	/// Accepted; the buyer may ship the product back.
	Approved,
	/// Declined with a reason note. Terminal.
	Rejected,
	/// Physical receipt of the returned product confirmed.
	ProductReturned,
	/// Refund issued to the buyer. Terminal.
	RefundProcessed,
}

impl ReturnStatus {
	/// Whether this status has no outgoing transitions.
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			ReturnStatus::Rejected | ReturnStatus::RefundProcessed
		)
	}
}

impl fmt::Display for ReturnStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ReturnStatus::Requested => write!(f, "Requested"),
			ReturnStatus::Approved => write!(f, "Approved"),
			ReturnStatus::Rejected => write!(f, "Rejected"),
			ReturnStatus::ProductReturned => write!(f, "ProductReturned"),
			ReturnStatus::RefundProcessed => write!(f, "RefundProcessed"),
		}
	}
}
