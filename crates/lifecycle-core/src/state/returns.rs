//! Return state machine rules.
//!
//! Requested -> {Approved, Rejected}; Approved -> ProductReturned ->
//! RefundProcessed. Rejection requires a reason note and processing the
//! refund requires a validated refund amount.

use crate::error::LifecycleError;
use lifecycle_types::{ActorRole, ReturnStatus};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Permission table for return transitions.
static TRANSITIONS: Lazy<HashMap<(ReturnStatus, ReturnStatus), Vec<ActorRole>>> =
	Lazy::new(|| {
		use ActorRole::*;
		use ReturnStatus::*;

		let mut m = HashMap::new();
		m.insert((Requested, Approved), vec![Seller, Admin]);
		m.insert((Requested, Rejected), vec![Seller, Admin]);
		// Physical receipt may also be confirmed by a logistics collaborator
		m.insert((Approved, ProductReturned), vec![Seller, Admin, System]);
		m.insert((ProductReturned, RefundProcessed), vec![Admin]);
		m
	});

/// Validates one return transition against the permission table.
pub fn validate_transition(
	from: ReturnStatus,
	to: ReturnStatus,
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
			action: format!("move the return from {} to {}", from, to),
		});
	}
	Ok(())
}

/// Whether the target status requires an accompanying reason note.
pub fn requires_reason(to: ReturnStatus) -> bool {
	to == ReturnStatus::Rejected
}

/// Validates a refund amount against the parent order total.
///
/// The amount must be present and satisfy `0 <= amount <= total`.
pub fn validate_refund_amount(
	amount: Option<Decimal>,
	total: Decimal,
) -> Result<Decimal, LifecycleError> {
	let amount = amount.ok_or_else(|| LifecycleError::InvalidRefundAmount {
		reason: "no refund amount set".into(),
	})?;
	if amount < Decimal::ZERO {
		return Err(LifecycleError::InvalidRefundAmount {
			reason: format!("{} is negative", amount),
		});
	}
	if amount > total {
		return Err(LifecycleError::InvalidRefundAmount {
			reason: format!("{} exceeds the order total {}", amount, total),
		});
	}
	Ok(amount)
}
