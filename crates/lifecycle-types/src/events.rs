//! Event types published after applied lifecycle commands.
//!
//! Every successfully applied command publishes one event on the manager's
//! event bus. Events are informational; delivery to subscribers is
//! fire-and-forget and a command never fails because nobody is listening.

use crate::{Actor, Dispute, DisputeStatus, Order, OrderStatus, Return, ReturnStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main event type encompassing all lifecycle events.
///
/// Events are categorized by the model that produces them, allowing
/// consumers to filter and handle specific event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LifecycleEvent {
	/// Events from the order state machine.
	Order(OrderEvent),
	/// Events from the dispute sub-lifecycle.
	Dispute(DisputeEvent),
	/// Events from the return sub-lifecycle.
	Return(ReturnEvent),
}

/// Events related to the order state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrderEvent {
	/// A new order has been placed in Pending.
	Placed { order: Order },
	/// An order transitioned to a new status.
	StatusChanged {
		order_id: String,
		from: OrderStatus,
		to: OrderStatus,
		actor: Actor,
	},
	/// Shipping details were attached to an order.
	ShippingAttached { order_id: String },
}

/// Events related to the dispute sub-lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DisputeEvent {
	/// A dispute was opened against an order.
	Opened { dispute: Dispute },
	/// A dispute transitioned to a new status.
	StatusChanged {
		dispute_id: String,
		order_id: String,
		from: DisputeStatus,
		to: DisputeStatus,
	},
}

/// Events related to the return sub-lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReturnEvent {
	/// A return was requested on a delivered order.
	Requested { request: Return },
	/// A return transitioned to a new status.
	StatusChanged {
		return_id: String,
		order_id: String,
		from: ReturnStatus,
		to: ReturnStatus,
	},
	/// A refund was processed; the parent order becomes Refunded.
	RefundProcessed {
		return_id: String,
		order_id: String,
		amount: Decimal,
	},
}
