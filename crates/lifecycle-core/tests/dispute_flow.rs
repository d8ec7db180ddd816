//! End-to-end tests for the dispute sub-lifecycle.

use lifecycle_core::{LifecycleError, LifecycleManager, OrderDraft};
use lifecycle_storage::implementations::memory::MemoryStorage;
use lifecycle_storage::StorageService;
use lifecycle_types::{
	Actor, ActorRole, DisputeStatus, DisputeType, OrderItem, OrderStatus, OrderTotals,
	PaymentMethod,
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
			product_id: "prod-vase-02".to_string(),
			title: "Ceramic vase".to_string(),
			quantity: 1,
			unit_price: Decimal::from(90u32),
		}],
		totals: OrderTotals {
			subtotal: Decimal::from(90u32),
			tax: Decimal::from(18u32),
			shipping_cost: Decimal::from(12u32),
			discount: Decimal::ZERO,
			total: Decimal::from(120u32),
		},
		payment_method: PaymentMethod::Wallet,
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

async fn paid_order(manager: &LifecycleManager, number: &str) -> String {
	let order = manager.create_order(draft(number)).await.unwrap();
	manager
		.transition_order(&order.id, OrderStatus::Paid, &Actor::system(), None)
		.await
		.unwrap();
	order.id
}

#[tokio::test]
async fn disputes_require_a_paid_order() {
	let manager = manager();
	let order = manager.create_order(draft("ORD-D-0001")).await.unwrap();

	let result = manager
		.open_dispute(
			&order.id,
			&buyer(),
			DisputeType::ProductNotReceived,
			"nothing arrived",
			vec![],
		)
		.await;
	assert!(matches!(
		result,
		Err(LifecycleError::IneligibleOrder {
			status: OrderStatus::Pending
		})
	));
}

#[tokio::test]
async fn admins_do_not_file_complaints() {
	let manager = manager();
	let order_id = paid_order(&manager, "ORD-D-0002").await;

	let result = manager
		.open_dispute(
			&order_id,
			&admin(),
			DisputeType::Other,
			"on behalf of the buyer",
			vec![],
		)
		.await;
	assert!(matches!(result, Err(LifecycleError::Forbidden { .. })));
}

#[tokio::test]
async fn review_then_resolution() {
	let manager = manager();
	let order_id = paid_order(&manager, "ORD-D-0003").await;

	let dispute = manager
		.open_dispute(
			&order_id,
			&buyer(),
			DisputeType::ProductDamaged,
			"handle broke off in transit",
			vec!["https://img.example/broken-handle.jpg".to_string()],
		)
		.await
		.unwrap();
	assert_eq!(dispute.status, DisputeStatus::Open);

	// The order records its dispute
	let order = manager.get_order(&order_id).await.unwrap();
	assert_eq!(order.dispute_id.as_deref(), Some(dispute.id.as_str()));

	let dispute = manager
		.update_dispute(&dispute.id, &seller(), DisputeStatus::UnderReview, None)
		.await
		.unwrap();
	assert_eq!(dispute.status, DisputeStatus::UnderReview);

	let dispute = manager
		.update_dispute(
			&dispute.id,
			&admin(),
			DisputeStatus::Resolved,
			Some("replacement shipped".to_string()),
		)
		.await
		.unwrap();
	assert_eq!(dispute.status, DisputeStatus::Resolved);
	assert_eq!(dispute.resolution.as_deref(), Some("replacement shipped"));
	assert!(dispute.resolved_at.is_some());
}

#[tokio::test]
async fn resolution_text_is_mandatory() {
	let manager = manager();
	let order_id = paid_order(&manager, "ORD-D-0004").await;

	let dispute = manager
		.open_dispute(
			&order_id,
			&buyer(),
			DisputeType::NotAsDescribed,
			"glaze colour differs from listing",
			vec![],
		)
		.await
		.unwrap();

	// Empty text loses to MissingResolution even from Open
	let result = manager
		.update_dispute(
			&dispute.id,
			&admin(),
			DisputeStatus::Resolved,
			Some("".to_string()),
		)
		.await;
	assert!(matches!(result, Err(LifecycleError::MissingResolution)));

	manager
		.update_dispute(&dispute.id, &seller(), DisputeStatus::UnderReview, None)
		.await
		.unwrap();
	let result = manager
		.update_dispute(&dispute.id, &admin(), DisputeStatus::Closed, None)
		.await;
	assert!(matches!(result, Err(LifecycleError::MissingResolution)));
}

#[tokio::test]
async fn review_cannot_be_skipped() {
	let manager = manager();
	let order_id = paid_order(&manager, "ORD-D-0005").await;

	let dispute = manager
		.open_dispute(
			&order_id,
			&buyer(),
			DisputeType::Other,
			"seller unresponsive",
			vec![],
		)
		.await
		.unwrap();

	let result = manager
		.update_dispute(
			&dispute.id,
			&admin(),
			DisputeStatus::Resolved,
			Some("handled".to_string()),
		)
		.await;
	assert!(matches!(
		result,
		Err(LifecycleError::InvalidTransition { .. })
	));
}

#[tokio::test]
async fn sellers_cannot_conclude_reviews() {
	let manager = manager();
	let order_id = paid_order(&manager, "ORD-D-0006").await;

	let dispute = manager
		.open_dispute(
			&order_id,
			&buyer(),
			DisputeType::ProductDamaged,
			"chipped rim",
			vec![],
		)
		.await
		.unwrap();
	manager
		.update_dispute(&dispute.id, &seller(), DisputeStatus::UnderReview, None)
		.await
		.unwrap();

	let result = manager
		.update_dispute(
			&dispute.id,
			&seller(),
			DisputeStatus::Resolved,
			Some("sent a new one".to_string()),
		)
		.await;
	assert!(matches!(result, Err(LifecycleError::Forbidden { .. })));
}

#[tokio::test]
async fn one_open_dispute_per_order() {
	let manager = manager();
	let order_id = paid_order(&manager, "ORD-D-0007").await;

	let first = manager
		.open_dispute(
			&order_id,
			&buyer(),
			DisputeType::ProductNotReceived,
			"no tracking movement for two weeks",
			vec![],
		)
		.await
		.unwrap();

	let second = manager
		.open_dispute(
			&order_id,
			&buyer(),
			DisputeType::Other,
			"still nothing",
			vec![],
		)
		.await;
	assert!(matches!(
		second,
		Err(LifecycleError::DisputeAlreadyOpen { .. })
	));

	// Once concluded, a new dispute may be opened
	manager
		.update_dispute(&first.id, &seller(), DisputeStatus::UnderReview, None)
		.await
		.unwrap();
	manager
		.update_dispute(
			&first.id,
			&admin(),
			DisputeStatus::Closed,
			Some("carrier confirmed delivery".to_string()),
		)
		.await
		.unwrap();

	let third = manager
		.open_dispute(
			&order_id,
			&buyer(),
			DisputeType::ProductDamaged,
			"arrived, but cracked",
			vec![],
		)
		.await
		.unwrap();
	assert_eq!(third.status, DisputeStatus::Open);

	let order = manager.get_order(&order_id).await.unwrap();
	assert_eq!(order.dispute_id.as_deref(), Some(third.id.as_str()));
}
