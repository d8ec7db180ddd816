//! Dispute state machine rules.
//!
//! Open -> UnderReview -> {Resolved, Closed}. Review is mandatory: a
//! dispute cannot jump from Open straight to a terminal status.

use crate::error::LifecycleError;
use lifecycle_types::{ActorRole, DisputeStatus, OrderStatus};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Permission table for dispute transitions.
static TRANSITIONS: Lazy<HashMap<(DisputeStatus, DisputeStatus), Vec<ActorRole>>> =
	Lazy::new(|| {
		use ActorRole::*;
		use DisputeStatus::*;

		let mut m = HashMap::new();
		m.insert((Open, UnderReview), vec![Seller, Admin]);
		m.insert((UnderReview, Resolved), vec![Admin]);
		m.insert((UnderReview, Closed), vec![Admin]);
		m
	});

/// Validates one dispute transition against the permission table.
pub fn validate_transition(
	from: DisputeStatus,
	to: DisputeStatus,
	role: ActorRole,
) -> Result<(), LifecycleError> {
	let allowed = TRANSITIONS
		.get(&(from, to))
		.ok_or_else(|| LifecycleError::InvalidTransition {
			from: from.to_string(),
			to: to.to_string(),
		})?;
	if !allowed.contains(&role) {
		return Err(LifecycleError::Forbidden {
			role,
			action: format!("move the dispute from {} to {}", from, to),
		});
	}
	Ok(())
}

/// Whether the target status requires resolution text.
pub fn requires_resolution(to: DisputeStatus) -> bool {
	to.is_terminal()
}

/// Whether a dispute may be opened against an order in the given status.
///
/// Disputes are rejected on unpaid orders and on orders already settled
/// by cancellation or refund.
pub fn order_eligible(status: OrderStatus) -> bool {
	matches!(
		status,
		OrderStatus::Paid | OrderStatus::Processing | OrderStatus::Shipped | OrderStatus::Delivered
	)
}
