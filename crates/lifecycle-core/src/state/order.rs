//! Order state machine rules.
//!
//! The happy path is Pending -> Paid -> Processing -> Shipped ->
//! Delivered, with Cancelled and Refunded as side branches. Cancelled and
//! Refunded have no outgoing edges; Delivered keeps a single outgoing
//! edge to Refunded so a processed return can settle the order.

use crate::error::LifecycleError;
use lifecycle_types::{ActorRole, OrderStatus};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Permission table: each legal (from, to) edge maps to the roles allowed
/// to drive it.
static TRANSITIONS: Lazy<HashMap<(OrderStatus, OrderStatus), Vec<ActorRole>>> = Lazy::new(|| {
	use ActorRole::*;
	use OrderStatus::*;

	let mut m = HashMap::new();
	m.insert((Pending, Paid), vec![System]);
	m.insert((Pending, Cancelled), vec![Buyer, Seller, Admin]);
	m.insert((Paid, Cancelled), vec![Buyer, Seller, Admin]);
	m.insert((Processing, Cancelled), vec![Buyer, Seller, Admin]);
	m.insert((Paid, Processing), vec![Seller, Admin]);
	m.insert((Processing, Shipped), vec![Seller, Admin]);
	m.insert((Shipped, Delivered), vec![Seller, Admin, System]);
	// Refunds are driven by an admin directly or by the system when a
	// return reaches RefundProcessed. Delivered orders are included so a
	// processed return can settle them.
	for from in [Pending, Paid, Processing, Shipped, Delivered] {
		m.insert((from, Refunded), vec![Admin, System]);
	}
	m
});

/// Validates one order transition against the permission table.
///
/// Fails with `InvalidTransition` if the edge does not exist and with
/// `Forbidden` if it exists but the role may not drive it.
pub fn validate_transition(
	from: OrderStatus,
	to: OrderStatus,
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
			action: format!("transition the order from {} to {}", from, to),
		});
	}
	Ok(())
}

/// Whether shipping details may be attached in the given status.
pub fn can_attach_shipping(status: OrderStatus) -> bool {
	matches!(status, OrderStatus::Processing | OrderStatus::Shipped)
}
