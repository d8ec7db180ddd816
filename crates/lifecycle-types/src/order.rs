//! Order types for the marketplace lifecycle system.
//!
//! This module defines the order aggregate: the order itself, its line
//! items, the monetary breakdown, shipping details, and the append-only
//! status history used for audit and timeline display.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A placed order moving through the lifecycle state machine.
///
/// Orders are created in [`OrderStatus::Pending`] by an external checkout
/// collaborator and are mutated only through lifecycle commands. They are
/// never physically deleted; cancellation and refund are terminal statuses,
/// not deletions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier for this order.
	pub id: String,
	/// Human-readable order number, unique and immutable once assigned.
	pub order_number: String,
	/// Current status of the order.
	pub status: OrderStatus,
	/// Monetary breakdown of the order.
	pub totals: OrderTotals,
	/// Payment method selected at checkout.
	pub payment_method: PaymentMethod,
	/// Whether payment has been settled by the payment collaborator.
	pub payment_settled: bool,
	/// Shipping details, attached while the order is being fulfilled.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub shipping: Option<ShippingInfo>,
	/// Free-text notes visible to the seller.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	/// Line items, immutable once the order is placed.
	#[serde(default)]
	pub items: Vec<OrderItem>,
	/// Append-only record of applied transitions, ordered by timestamp.
	#[serde(default)]
	pub history: Vec<OrderStatusHistory>,
	/// Identifier of the most recently opened dispute, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub dispute_id: Option<String>,
	/// Identifier of the most recently requested return, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub return_id: Option<String>,
	/// Timestamp when this order was created.
	pub created_at: u64,
	/// Timestamp when this order was last updated.
	pub updated_at: u64,
}

/// A single line item on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
	/// Identifier of the listed product.
	pub product_id: String,
	/// Product title captured at checkout time.
	pub title: String,
	/// Quantity ordered.
	pub quantity: u32,
	/// Unit price captured at checkout time.
	pub unit_price: Decimal,
}

/// Monetary breakdown of an order.
///
/// The invariant `total == subtotal + tax + shipping_cost - discount` must
/// hold for every order at every point in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
	/// Sum of line item prices.
	pub subtotal: Decimal,
	/// Tax charged on the order.
	pub tax: Decimal,
	/// Shipping cost charged to the buyer.
	pub shipping_cost: Decimal,
	/// Discount applied at checkout.
	pub discount: Decimal,
	/// Total charged to the buyer.
	pub total: Decimal,
}

impl OrderTotals {
	/// The total implied by the component amounts.
	pub fn expected_total(&self) -> Decimal {
		self.subtotal + self.tax + self.shipping_cost - self.discount
	}

	/// Whether the stored total is non-negative and matches its components.
	pub fn is_consistent(&self) -> bool {
		self.total >= Decimal::ZERO && self.total == self.expected_total()
	}
}

/// Payment method selected at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
	/// Credit or debit card.
	Card,
	/// Direct bank transfer.
	BankTransfer,
	/// Marketplace wallet balance.
	Wallet,
	/// Payment collected on delivery.
	CashOnDelivery,
}

/// Shipping details attached while an order is being fulfilled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingInfo {
	/// Carrier tracking number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tracking_number: Option<String>,
	/// Carrier tracking URL.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tracking_url: Option<String>,
	/// Estimated delivery date communicated to the buyer.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub estimated_delivery: Option<NaiveDate>,
}

/// One immutable record of an applied order transition.
///
/// Exactly one entry is appended per transition. Entries are never mutated,
/// deleted, or reordered afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusHistory {
	/// The status transitioned to.
	pub status: OrderStatus,
	/// Optional human note supplied with the command.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub note: Option<String>,
	/// Identifier of the actor who triggered the transition.
	/// None for system-triggered transitions.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub actor_id: Option<String>,
	/// Timestamp when the transition was applied.
	pub timestamp: u64,
}

/// Status of an order in the lifecycle system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
	/// Order has been placed but payment is not yet confirmed.
	Pending,
	/// Payment has been confirmed.
	Paid,
	/// The seller is preparing the order.
	Processing,
	/// The order has been handed to a carrier.
	Shipped,
	/// Delivery has been confirmed. Terminal.
	Delivered,
	/// The order was cancelled before delivery. Terminal.
	Cancelled,
	/// The order was refunded. Terminal.
	Refunded,
}

impl OrderStatus {
	/// Whether this status has no outgoing transitions.
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Refunded
		)
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Pending => write!(f, "Pending"),
			OrderStatus::Paid => write!(f, "Paid"),
			OrderStatus::Processing => write!(f, "Processing"),
			OrderStatus::Shipped => write!(f, "Shipped"),
			OrderStatus::Delivered => write!(f, "Delivered"),
			OrderStatus::Cancelled => write!(f, "Cancelled"),
			OrderStatus::Refunded => write!(f, "Refunded"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn totals_consistency() {
		let totals = OrderTotals {
			subtotal: Decimal::from(400u32),
			tax: Decimal::from(80u32),
			shipping_cost: Decimal::from(40u32),
			discount: Decimal::from(20u32),
			total: Decimal::from(500u32),
		};
		assert!(totals.is_consistent());

		let skewed = OrderTotals {
			total: Decimal::from(499u32),
			..totals
		};
		assert!(!skewed.is_consistent());
	}

	#[test]
	fn terminal_statuses() {
		assert!(OrderStatus::Delivered.is_terminal());
		assert!(OrderStatus::Cancelled.is_terminal());
		assert!(OrderStatus::Refunded.is_terminal());
		assert!(!OrderStatus::Shipped.is_terminal());
	}
}
