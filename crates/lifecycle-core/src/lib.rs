//! Core lifecycle manager for the marketplace order system.
//!
//! This module provides the command/query surface over orders, disputes,
//! and returns: validating each command against the state machine rules,
//! applying it atomically through the storage collaborator, appending the
//! audit history, and publishing events for out-of-scope consumers.
//! Writes for a single order are assumed to be serialized by the storage
//! collaborator; commands on different orders are independent.

use lifecycle_storage::{StorageError, StorageService};
use lifecycle_types::{
	Actor, ActorRole, Dispute, DisputeEvent, DisputeStatus, DisputeType, LifecycleEvent, Order,
	OrderEvent, OrderItem, OrderStatus, OrderStatusHistory, OrderTotals, PaymentMethod, Return,
	ReturnEvent, ReturnReason, ReturnStatus, ShippingInfo, StoreKey,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::instrument;
use uuid::Uuid;

pub mod builder;
pub mod error;
pub mod event_bus;
pub mod state;

pub use builder::LifecycleBuilder;
pub use error::{ErrorClass, LifecycleError};
pub use event_bus::EventBus;

/// Utility function to truncate an identifier for display purposes.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
fn truncate_id(id: &str) -> String {
	if id.len() <= 8 {
		id.to_string()
	} else {
		format!("{}..", &id[..8])
	}
}

/// Reads the wall clock as unix seconds.
fn now_secs() -> Result<u64, LifecycleError> {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs())
		.map_err(|e| LifecycleError::Time(e.to_string()))
}

/// Draft of a new order, produced by an external checkout collaborator
/// when a buyer commits a cart or accepted quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
	/// Human-readable order number assigned at checkout.
	pub order_number: String,
	/// Line items captured at checkout.
	pub items: Vec<OrderItem>,
	/// Monetary breakdown, already summed by the checkout collaborator.
	pub totals: OrderTotals,
	/// Payment method selected at checkout.
	pub payment_method: PaymentMethod,
	/// Free-text notes visible to the seller.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}

/// Command/query surface of the order lifecycle.
///
/// The manager coordinates the three state machines over a shared storage
/// collaborator:
/// - Order: payment, fulfilment, cancellation, refund
/// - Dispute: complaint intake and resolution
/// - Return: return approval, physical receipt, refund processing
pub struct LifecycleManager {
	/// Storage service persisting orders, disputes, and returns.
	storage: Arc<StorageService>,
	/// Event bus notified after every applied command.
	event_bus: EventBus,
}

impl LifecycleManager {
	/// Creates a new manager over the given storage service.
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self {
			storage,
			event_bus: EventBus::new(256),
		}
	}

	/// Returns a reference to the event bus.
	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	/// Returns a reference to the storage service.
	pub fn storage(&self) -> &Arc<StorageService> {
		&self.storage
	}

	// --- Queries ---

	/// Gets an order by id.
	pub async fn get_order(&self, order_id: &str) -> Result<Order, LifecycleError> {
		match self
			.storage
			.retrieve(StoreKey::Orders.as_str(), order_id)
			.await
		{
			Ok(order) => Ok(order),
			Err(StorageError::NotFound) => Err(LifecycleError::NotFound {
				kind: "Order",
				id: order_id.to_string(),
			}),
			Err(e) => Err(e.into()),
		}
	}

	/// Gets an order by its human-readable order number.
	pub async fn get_order_by_number(&self, order_number: &str) -> Result<Order, LifecycleError> {
		let order_id: String = match self
			.storage
			.retrieve(StoreKey::OrderByNumber.as_str(), order_number)
			.await
		{
			Ok(id) => id,
			Err(StorageError::NotFound) => {
				return Err(LifecycleError::NotFound {
					kind: "Order",
					id: order_number.to_string(),
				})
			}
			Err(e) => return Err(e.into()),
		};
		self.get_order(&order_id).await
	}

	/// Gets a dispute by id.
	pub async fn get_dispute(&self, dispute_id: &str) -> Result<Dispute, LifecycleError> {
		match self
			.storage
			.retrieve(StoreKey::Disputes.as_str(), dispute_id)
			.await
		{
			Ok(dispute) => Ok(dispute),
			Err(StorageError::NotFound) => Err(LifecycleError::NotFound {
				kind: "Dispute",
				id: dispute_id.to_string(),
			}),
			Err(e) => Err(e.into()),
		}
	}

	/// Gets a return request by id.
	pub async fn get_return(&self, return_id: &str) -> Result<Return, LifecycleError> {
		match self
			.storage
			.retrieve(StoreKey::Returns.as_str(), return_id)
			.await
		{
			Ok(ret) => Ok(ret),
			Err(StorageError::NotFound) => Err(LifecycleError::NotFound {
				kind: "Return",
				id: return_id.to_string(),
			}),
			Err(e) => Err(e.into()),
		}
	}

	// --- Order commands ---

	/// Places a new order in Pending.
	///
	/// Validates the totals invariant and the uniqueness of the order
	/// number, persists the order with an empty history, and maintains
	/// the order-number index.
	pub async fn create_order(&self, draft: OrderDraft) -> Result<Order, LifecycleError> {
		if !draft.totals.is_consistent() {
			return Err(LifecycleError::InconsistentTotals);
		}
		if self
			.storage
			.exists(StoreKey::OrderByNumber.as_str(), &draft.order_number)
			.await?
		{
			return Err(LifecycleError::DuplicateOrderNumber {
				number: draft.order_number,
			});
		}

		let now = now_secs()?;
		let order = Order {
			id: Uuid::new_v4().to_string(),
			order_number: draft.order_number,
			status: OrderStatus::Pending,
			totals: draft.totals,
			payment_method: draft.payment_method,
			payment_settled: false,
			shipping: None,
			notes: draft.notes,
			items: draft.items,
			history: Vec::new(),
			dispute_id: None,
			return_id: None,
			created_at: now,
			updated_at: now,
		};

		self.storage
			.store(StoreKey::Orders.as_str(), &order.id, &order)
			.await?;
		self.storage
			.store(
				StoreKey::OrderByNumber.as_str(),
				&order.order_number,
				&order.id,
			)
			.await?;

		tracing::info!(
			order_id = %truncate_id(&order.id),
			order_number = %order.order_number,
			"Order placed"
		);
		self.event_bus
			.publish(LifecycleEvent::Order(OrderEvent::Placed {
				order: order.clone(),
			}))
			.ok();

		Ok(order)
	}

	/// Transitions an order to a new status.
	///
	/// Validates the edge and the actor role against the permission
	/// table. On success the status is updated and exactly one history
	/// entry is appended. Replaying a command whose target equals the
	/// current status is a safe no-op: the unchanged order is returned
	/// and nothing is appended.
	#[instrument(skip_all, fields(order_id = %truncate_id(order_id), to = %target))]
	pub async fn transition_order(
		&self,
		order_id: &str,
		target: OrderStatus,
		actor: &Actor,
		note: Option<String>,
	) -> Result<Order, LifecycleError> {
		let mut order = self.get_order(order_id).await?;

		if order.status == target {
			tracing::debug!("Replayed transition ignored");
			return Ok(order);
		}

		state::order::validate_transition(order.status, target, actor.role)?;

		let from = order.status;
		let now = now_secs()?;
		order.status = target;
		if target == OrderStatus::Paid {
			order.payment_settled = true;
		}
		order.history.push(OrderStatusHistory {
			status: target,
			note,
			actor_id: actor.id.clone(),
			timestamp: now,
		});
		order.updated_at = now;

		self.storage
			.update(StoreKey::Orders.as_str(), order_id, &order)
			.await?;

		tracing::info!(from = %from, actor = %actor, "Order transitioned");
		self.event_bus
			.publish(LifecycleEvent::Order(OrderEvent::StatusChanged {
				order_id: order.id.clone(),
				from,
				to: target,
				actor: actor.clone(),
			}))
			.ok();

		Ok(order)
	}

	/// Attaches shipping details to an order being fulfilled.
	///
	/// Allowed only while the order is Processing or Shipped; does not
	/// itself change the status.
	pub async fn attach_shipping_info(
		&self,
		order_id: &str,
		shipping: ShippingInfo,
	) -> Result<Order, LifecycleError> {
		let mut order = self.get_order(order_id).await?;

		if !state::order::can_attach_shipping(order.status) {
			return Err(LifecycleError::InvalidState {
				status: order.status,
			});
		}

		order.shipping = Some(shipping);
		order.updated_at = now_secs()?;
		self.storage
			.update(StoreKey::Orders.as_str(), order_id, &order)
			.await?;

		tracing::info!(order_id = %truncate_id(order_id), "Shipping info attached");
		self.event_bus
			.publish(LifecycleEvent::Order(OrderEvent::ShippingAttached {
				order_id: order.id.clone(),
			}))
			.ok();

		Ok(order)
	}

	/// Cancels an order with a mandatory reason.
	///
	/// Fails with `CannotCancel` when the order already reached a
	/// terminal status; otherwise delegates to the state machine, which
	/// also rejects cancellation of shipped orders.
	pub async fn cancel_order(
		&self,
		order_id: &str,
		actor: &Actor,
		reason: &str,
	) -> Result<Order, LifecycleError> {
		if reason.trim().is_empty() {
			return Err(LifecycleError::MissingReason);
		}

		let order = self.get_order(order_id).await?;
		if order.status.is_terminal() {
			return Err(LifecycleError::CannotCancel {
				status: order.status,
			});
		}

		self.transition_order(
			order_id,
			OrderStatus::Cancelled,
			actor,
			Some(reason.to_string()),
		)
		.await
	}

	// --- Dispute commands ---

	/// Opens a dispute against an order.
	///
	/// Only buyers and sellers file complaints, only against orders that
	/// are paid and not settled by cancellation or refund, and only while
	/// no other dispute on the order is open.
	#[instrument(skip_all, fields(order_id = %truncate_id(order_id)))]
	pub async fn open_dispute(
		&self,
		order_id: &str,
		actor: &Actor,
		dispute_type: DisputeType,
		reason: &str,
		evidence: Vec<String>,
	) -> Result<Dispute, LifecycleError> {
		let complainant = match (&actor.role, &actor.id) {
			(ActorRole::Buyer | ActorRole::Seller, Some(id)) => id.clone(),
			_ => {
				return Err(LifecycleError::Forbidden {
					role: actor.role,
					action: "open a dispute".to_string(),
				})
			}
		};
		if reason.trim().is_empty() {
			return Err(LifecycleError::MissingReason);
		}

		let mut order = self.get_order(order_id).await?;
		if !state::dispute::order_eligible(order.status) {
			return Err(LifecycleError::IneligibleOrder {
				status: order.status,
			});
		}

		// A resolved or closed dispute does not block a new one
		if let Some(existing_id) = &order.dispute_id {
			let existing = self.get_dispute(existing_id).await?;
			if existing.is_open() {
				return Err(LifecycleError::DisputeAlreadyOpen {
					dispute_id: existing.id,
				});
			}
		}

		let now = now_secs()?;
		let dispute = Dispute {
			id: Uuid::new_v4().to_string(),
			order_id: order.id.clone(),
			complainant,
			dispute_type,
			reason: reason.to_string(),
			evidence,
			status: DisputeStatus::Open,
			resolution: None,
			resolved_at: None,
			created_at: now,
			updated_at: now,
		};

		self.storage
			.store(StoreKey::Disputes.as_str(), &dispute.id, &dispute)
			.await?;
		order.dispute_id = Some(dispute.id.clone());
		order.updated_at = now;
		self.storage
			.update(StoreKey::Orders.as_str(), order_id, &order)
			.await?;

		tracing::info!(
			dispute_id = %truncate_id(&dispute.id),
			actor = %actor,
			"Dispute opened"
		);
		self.event_bus
			.publish(LifecycleEvent::Dispute(DisputeEvent::Opened {
				dispute: dispute.clone(),
			}))
			.ok();

		Ok(dispute)
	}

	/// Moves a dispute to a new status.
	///
	/// Terminal transitions require non-empty resolution text and stamp
	/// resolved_at. Replaying the current status is a no-op.
	#[instrument(skip_all, fields(dispute_id = %truncate_id(dispute_id), to = %target))]
	pub async fn update_dispute(
		&self,
		dispute_id: &str,
		actor: &Actor,
		target: DisputeStatus,
		resolution: Option<String>,
	) -> Result<Dispute, LifecycleError> {
		let mut dispute = self.get_dispute(dispute_id).await?;

		if dispute.status == target {
			tracing::debug!("Replayed transition ignored");
			return Ok(dispute);
		}

		// A terminal move without text always reports MissingResolution,
		// even when the edge itself is also illegal
		if state::dispute::requires_resolution(target)
			&& resolution.as_deref().map(str::trim).unwrap_or("").is_empty()
		{
			return Err(LifecycleError::MissingResolution);
		}
		state::dispute::validate_transition(dispute.status, target, actor.role)?;

		let from = dispute.status;
		let now = now_secs()?;
		dispute.status = target;
		if target.is_terminal() {
			dispute.resolution = resolution;
			dispute.resolved_at = Some(now);
		}
		dispute.updated_at = now;

		self.storage
			.update(StoreKey::Disputes.as_str(), dispute_id, &dispute)
			.await?;

		tracing::info!(from = %from, actor = %actor, "Dispute updated");
		self.event_bus
			.publish(LifecycleEvent::Dispute(DisputeEvent::StatusChanged {
				dispute_id: dispute.id.clone(),
				order_id: dispute.order_id.clone(),
				from,
				to: target,
			}))
			.ok();

		Ok(dispute)
	}

	// --- Return commands ---

	/// Requests a return on a delivered order.
	///
	/// Only the buyer files return requests, only against delivered
	/// orders, and only while no other request on the order is pending.
	#[instrument(skip_all, fields(order_id = %truncate_id(order_id)))]
	pub async fn request_return(
		&self,
		order_id: &str,
		actor: &Actor,
		reason: ReturnReason,
		description: Option<String>,
		evidence: Vec<String>,
	) -> Result<Return, LifecycleError> {
		let requester = match (&actor.role, &actor.id) {
			(ActorRole::Buyer, Some(id)) => id.clone(),
			_ => {
				return Err(LifecycleError::Forbidden {
					role: actor.role,
					action: "request a return".to_string(),
				})
			}
		};

		let mut order = self.get_order(order_id).await?;
		if order.status != OrderStatus::Delivered {
			return Err(LifecycleError::IneligibleOrder {
				status: order.status,
			});
		}

		// A rejected or refunded request does not block a new one
		if let Some(existing_id) = &order.return_id {
			let existing = self.get_return(existing_id).await?;
			if !existing.status.is_terminal() {
				return Err(LifecycleError::ReturnAlreadyRequested {
					return_id: existing.id,
				});
			}
		}

		let now = now_secs()?;
		let request = Return {
			id: Uuid::new_v4().to_string(),
			order_id: order.id.clone(),
			requester,
			reason,
			description,
			evidence,
			status: ReturnStatus::Requested,
			refund_amount: None,
			refund_reason: None,
			approved_by: None,
			created_at: now,
			updated_at: now,
		};

		self.storage
			.store(StoreKey::Returns.as_str(), &request.id, &request)
			.await?;
		order.return_id = Some(request.id.clone());
		order.updated_at = now;
		self.storage
			.update(StoreKey::Orders.as_str(), order_id, &order)
			.await?;

		tracing::info!(
			return_id = %truncate_id(&request.id),
			actor = %actor,
			"Return requested"
		);
		self.event_bus
			.publish(LifecycleEvent::Return(ReturnEvent::Requested {
				request: request.clone(),
			}))
			.ok();

		Ok(request)
	}

	/// Moves a return request to a new status.
	///
	/// Rejection requires a reason note. A refund amount supplied with
	/// any update is validated against the parent order total before it
	/// is recorded. Reaching RefundProcessed requires a validated amount
	/// and transitions the parent order to Refunded as a system actor.
	/// Replaying the current status is a no-op.
	#[instrument(skip_all, fields(return_id = %truncate_id(return_id), to = %target))]
	pub async fn update_return(
		&self,
		return_id: &str,
		actor: &Actor,
		target: ReturnStatus,
		refund_amount: Option<Decimal>,
		refund_reason: Option<String>,
	) -> Result<Return, LifecycleError> {
		let mut request = self.get_return(return_id).await?;

		if request.status == target {
			tracing::debug!("Replayed transition ignored");
			return Ok(request);
		}

		if state::returns::requires_reason(target)
			&& refund_reason
				.as_deref()
				.map(str::trim)
				.unwrap_or("")
				.is_empty()
		{
			return Err(LifecycleError::MissingResolution);
		}
		state::returns::validate_transition(request.status, target, actor.role)?;

		let order = self.get_order(&request.order_id).await?;

		// Amounts are validated the moment they are supplied so a stored
		// amount is always within bounds
		if let Some(amount) = refund_amount {
			let amount = state::returns::validate_refund_amount(Some(amount), order.totals.total)?;
			request.refund_amount = Some(amount);
		}

		let processed_amount = if target == ReturnStatus::RefundProcessed {
			let amount =
				state::returns::validate_refund_amount(request.refund_amount, order.totals.total)?;
			// The order-side edge must be legal before anything is written
			state::order::validate_transition(order.status, OrderStatus::Refunded, ActorRole::System)?;
			Some(amount)
		} else {
			None
		};

		let from = request.status;
		let now = now_secs()?;
		request.status = target;
		if matches!(target, ReturnStatus::Approved | ReturnStatus::Rejected) {
			request.approved_by = actor.id.clone();
		}
		if let Some(note) = refund_reason {
			request.refund_reason = Some(note);
		}
		request.updated_at = now;

		self.storage
			.update(StoreKey::Returns.as_str(), return_id, &request)
			.await?;

		tracing::info!(from = %from, actor = %actor, "Return updated");
		self.event_bus
			.publish(LifecycleEvent::Return(ReturnEvent::StatusChanged {
				return_id: request.id.clone(),
				order_id: request.order_id.clone(),
				from,
				to: target,
			}))
			.ok();

		if let Some(amount) = processed_amount {
			self.transition_order(
				&request.order_id,
				OrderStatus::Refunded,
				&Actor::system(),
				Some(format!("Refund processed for return {}", request.id)),
			)
			.await?;

			self.event_bus
				.publish(LifecycleEvent::Return(ReturnEvent::RefundProcessed {
					return_id: request.id.clone(),
					order_id: request.order_id.clone(),
					amount,
				}))
				.ok();
		}

		Ok(request)
	}
}
