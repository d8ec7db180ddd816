//! End-to-end tests for the return sub-lifecycle and its refund side
//! effect on the parent order.

use lifecycle_core::{LifecycleError, LifecycleManager, OrderDraft};
use lifecycle_storage::implementations::memory::MemoryStorage;
use lifecycle_storage::StorageService;
use lifecycle_types::{
	Actor, ActorRole, LifecycleEvent, OrderItem, OrderStatus, OrderTotals, PaymentMethod,
	ReturnEvent, ReturnReason, ReturnStatus,
};
use rust_decimal::Decimal;
use std::sync::Arc;

fn manager() -> LifecycleManager {
	LifecycleManager::new(Arc::new(StorageService::new(Box::new(MemoryStorage::new()))))
}

fn draft(order_number: &str) -> OrderDraft {
	OrderDraft {
		order_number: order_number.to_string(),
		items: vec![OrderItem {
			product_id: "prod-scarf-03".to_string(),
			title: "Hand-woven scarf".to_string(),
			quantity: 1,
			unit_price: Decimal::from(400_000u32),
		}],
		totals: OrderTotals {
			subtotal: Decimal::from(400_000u32),
			tax: Decimal::from(80_000u32),
			shipping_cost: Decimal::from(40_000u32),
			discount: Decimal::from(20_000u32),
			total: Decimal::from(500_000u32),
		},
		payment_method: PaymentMethod::BankTransfer,
		notes: None,
	}
}

fn buyer() -> Actor {
	Actor::new(ActorRole::Buyer, "buyer-1")
}

fn seller() -> Actor {
	Actor::new(ActorRole::Seller, "seller-1")
}

fn admin() -> Actor {
	Actor::new(ActorRole::Admin, "admin-1")
}

async fn delivered_order(manager: &LifecycleManager, number: &str) -> String {
	let order = manager.create_order(draft(number)).await.unwrap();
	manager
		.transition_order(&order.id, OrderStatus::Paid, &Actor::system(), None)
		.await
		.unwrap();
	manager
		.transition_order(&order.id, OrderStatus::Processing, &seller(), None)
		.await
		.unwrap();
	manager
		.transition_order(&order.id, OrderStatus::Shipped, &seller(), None)
		.await
		.unwrap();
	manager
		.transition_order(&order.id, OrderStatus::Delivered, &Actor::system(), None)
		.await
		.unwrap();
	order.id
}

#[tokio::test]
async fn returns_require_a_delivered_order() {
	let manager = manager();
	let order = manager.create_order(draft("ORD-R-0001")).await.unwrap();
	manager
		.transition_order(&order.id, OrderStatus::Paid, &Actor::system(), None)
		.await
		.unwrap();

	let result = manager
		.request_return(&order.id, &buyer(), ReturnReason::Defective, None, vec![])
		.await;
	assert!(matches!(
		result,
		Err(LifecycleError::IneligibleOrder {
			status: OrderStatus::Paid
		})
	));
}

#[tokio::test]
async fn only_the_buyer_requests_returns() {
	let manager = manager();
	let order_id = delivered_order(&manager, "ORD-R-0002").await;

	let result = manager
		.request_return(&order_id, &seller(), ReturnReason::Other, None, vec![])
		.await;
	assert!(matches!(result, Err(LifecycleError::Forbidden { .. })));
}

#[tokio::test]
async fn rejection_needs_a_reason_note() {
	let manager = manager();
	let order_id = delivered_order(&manager, "ORD-R-0003").await;
	let request = manager
		.request_return(
			&order_id,
			&buyer(),
			ReturnReason::ChangedMind,
			None,
			vec![],
		)
		.await
		.unwrap();

	let result = manager
		.update_return(&request.id, &seller(), ReturnStatus::Rejected, None, None)
		.await;
	assert!(matches!(result, Err(LifecycleError::MissingResolution)));

	let request = manager
		.update_return(
			&request.id,
			&seller(),
			ReturnStatus::Rejected,
			None,
			Some("custom piece, sale is final".to_string()),
		)
		.await
		.unwrap();
	assert_eq!(request.status, ReturnStatus::Rejected);
	assert_eq!(request.approved_by.as_deref(), Some("seller-1"));
}

#[tokio::test]
async fn refund_amount_is_validated_when_supplied() {
	let manager = manager();
	let order_id = delivered_order(&manager, "ORD-R-0004").await;
	let request = manager
		.request_return(
			&order_id,
			&buyer(),
			ReturnReason::Defective,
			Some("loose threads along the hem".to_string()),
			vec![],
		)
		.await
		.unwrap();

	let result = manager
		.update_return(
			&request.id,
			&seller(),
			ReturnStatus::Approved,
			Some(Decimal::from(500_001u32)),
			None,
		)
		.await;
	assert!(matches!(
		result,
		Err(LifecycleError::InvalidRefundAmount { .. })
	));

	// The rejected command wrote nothing
	let reloaded = manager.get_return(&request.id).await.unwrap();
	assert_eq!(reloaded.status, ReturnStatus::Requested);
	assert_eq!(reloaded.refund_amount, None);
}

#[tokio::test]
async fn refund_cannot_be_processed_without_an_amount() {
	let manager = manager();
	let order_id = delivered_order(&manager, "ORD-R-0005").await;
	let request = manager
		.request_return(&order_id, &buyer(), ReturnReason::WrongItem, None, vec![])
		.await
		.unwrap();

	manager
		.update_return(&request.id, &seller(), ReturnStatus::Approved, None, None)
		.await
		.unwrap();
	manager
		.update_return(
			&request.id,
			&Actor::system(),
			ReturnStatus::ProductReturned,
			None,
			None,
		)
		.await
		.unwrap();

	let result = manager
		.update_return(
			&request.id,
			&admin(),
			ReturnStatus::RefundProcessed,
			None,
			None,
		)
		.await;
	assert!(matches!(
		result,
		Err(LifecycleError::InvalidRefundAmount { .. })
	));

	let over = manager
		.update_return(
			&request.id,
			&admin(),
			ReturnStatus::RefundProcessed,
			Some(Decimal::from(500_001u32)),
			None,
		)
		.await;
	assert!(matches!(
		over,
		Err(LifecycleError::InvalidRefundAmount { .. })
	));
}

#[tokio::test]
async fn processed_refund_settles_the_order() {
	let manager = manager();
	let order_id = delivered_order(&manager, "ORD-R-0006").await;
	let request = manager
		.request_return(
			&order_id,
			&buyer(),
			ReturnReason::NotAsDescribed,
			Some("colour is nothing like the photos".to_string()),
			vec!["https://img.example/scarf.jpg".to_string()],
		)
		.await
		.unwrap();

	manager
		.update_return(&request.id, &seller(), ReturnStatus::Approved, None, None)
		.await
		.unwrap();
	manager
		.update_return(
			&request.id,
			&seller(),
			ReturnStatus::ProductReturned,
			None,
			None,
		)
		.await
		.unwrap();

	let mut events = manager.event_bus().subscribe();

	let request = manager
		.update_return(
			&request.id,
			&admin(),
			ReturnStatus::RefundProcessed,
			Some(Decimal::from(500_000u32)),
			Some("full refund".to_string()),
		)
		.await
		.unwrap();

	assert_eq!(request.status, ReturnStatus::RefundProcessed);
	assert_eq!(request.refund_amount, Some(Decimal::from(500_000u32)));

	// Cross-entity invariant: the parent order is now refunded, through
	// a system-attributed history entry
	let order = manager.get_order(&order_id).await.unwrap();
	assert_eq!(order.status, OrderStatus::Refunded);
	let last = order.history.last().unwrap();
	assert_eq!(last.status, OrderStatus::Refunded);
	assert_eq!(last.actor_id, None);

	// The refund event closes the published sequence
	let mut refund_event = None;
	while let Ok(event) = events.try_recv() {
		if let LifecycleEvent::Return(ReturnEvent::RefundProcessed { amount, .. }) = event {
			refund_event = Some(amount);
		}
	}
	assert_eq!(refund_event, Some(Decimal::from(500_000u32)));
}

#[tokio::test]
async fn one_pending_return_per_order() {
	let manager = manager();
	let order_id = delivered_order(&manager, "ORD-R-0007").await;

	let first = manager
		.request_return(&order_id, &buyer(), ReturnReason::ChangedMind, None, vec![])
		.await
		.unwrap();

	let second = manager
		.request_return(&order_id, &buyer(), ReturnReason::Other, None, vec![])
		.await;
	assert!(matches!(
		second,
		Err(LifecycleError::ReturnAlreadyRequested { .. })
	));

	manager
		.update_return(
			&first.id,
			&seller(),
			ReturnStatus::Rejected,
			None,
			Some("outside the return window".to_string()),
		)
		.await
		.unwrap();

	let third = manager
		.request_return(&order_id, &buyer(), ReturnReason::Defective, None, vec![])
		.await
		.unwrap();
	assert_eq!(third.status, ReturnStatus::Requested);
}
