//! Dispute sub-lifecycle types.
//!
//! A dispute is a complaint filed by a buyer or seller against a placed
//! order. It carries its own status enum and transition rules and
//! references the parent order without mutating it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A complaint filed against an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispute {
	/// Unique identifier for this dispute.
	pub id: String,
	/// Identifier of the order the dispute was filed against.
	pub order_id: String,
	/// Identifier of the user who filed the complaint.
	pub complainant: String,
	/// Enumerated reason for the complaint.
	pub dispute_type: DisputeType,
	/// Free-text description of the complaint.
	pub reason: String,
	/// References to supporting evidence, e.g. image URLs.
	#[serde(default)]
	pub evidence: Vec<String>,
	/// Current status of the dispute.
	pub status: DisputeStatus,
	/// Resolution text recorded when the dispute reaches a terminal status.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub resolution: Option<String>,
	/// Timestamp when the dispute was resolved or closed.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub resolved_at: Option<u64>,
	/// Timestamp when this dispute was created.
	pub created_at: u64,
	/// Timestamp when this dispute was last updated.
	pub updated_at: u64,
}

/// Enumerated complaint reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisputeType {
	/// The buyer never received the product.
	ProductNotReceived,
	/// The product arrived damaged.
	ProductDamaged,
	/// The product does not match its listing.
	NotAsDescribed,
	/// Anything else, explained in the reason text.
	Other,
}

/// Status of a dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisputeStatus {
	/// Filed and awaiting acknowledgement.
	Open,
	/// Acknowledged and being reviewed.
	UnderReview,
	/// Resolved in favour of one party. Terminal.
	Resolved,
	/// Closed without resolution in either party's favour. Terminal.
	Closed,
}

impl DisputeStatus {
	/// Whether this status has no outgoing transitions.
	pub fn is_terminal(&self) -> bool {
		matches!(self, DisputeStatus::Resolved | DisputeStatus::Closed)
	}
}

impl fmt::Display for DisputeStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DisputeStatus::Open => write!(f, "Open"),
			DisputeStatus::UnderReview => write!(f, "UnderReview"),
			DisputeStatus::Resolved => write!(f, "Resolved"),
			DisputeStatus::Closed => write!(f, "Closed"),
		}
	}
}

impl Dispute {
	/// Whether this dispute still blocks a new one being opened.
	pub fn is_open(&self) -> bool {
		!self.status.is_terminal()
	}
}
