use canteen_core::clients::{actor_client::ActorClient, OrderClient};
use canteen_core::framework::{mock::MockClient, FrameworkError};
use canteen_core::model::{
    Catalog, ItemId, LineItem, OrderDraft, OrderId, OrderRecord, OrderStatus, PaymentMethod,
    PaymentStatus, UserId,
};
use canteen_core::order_actor::{OrderActionResult, OrderError};

fn draft(user: &str, item: &str, quantity: u32) -> OrderDraft {
    let catalog = Catalog::canteen();
    let item = catalog.item(&ItemId::from(item)).unwrap().clone();
    OrderDraft::new(UserId::from(user), vec![LineItem::new(item, quantity)], 1_000)
}

/// Real Order actor: placement, validation and the status rules.
#[tokio::test]
async fn test_order_actor_enforces_status_order() {
    let (order_actor, order_client) = canteen_core::order_actor::new(8);
    let handle = tokio::spawn(order_actor.run(()));

    let order = order_client
        .place_order(OrderId::from("order_1"), draft("u1", "samosa", 2))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Placed);
    assert_eq!(order.total_amount, 30.0);

    let id = order.id.clone();
    assert!(order_client.advance_status(id.clone(), OrderStatus::Preparing).await.unwrap());
    // Repeating the current status is a no-op, not an error.
    assert!(!order_client.advance_status(id.clone(), OrderStatus::Preparing).await.unwrap());

    let err = order_client
        .advance_status(id.clone(), OrderStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Preparing,
            to: OrderStatus::Completed
        }
    ));

    let err = order_client
        .advance_status(id.clone(), OrderStatus::Placed)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition { .. }));

    let stored = order_client.get(id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Preparing);

    drop(order_client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_order_actor_rejects_bad_drafts() {
    let (order_actor, order_client) = canteen_core::order_actor::new(8);
    tokio::spawn(order_actor.run(()));

    let empty = OrderDraft::new(UserId::from("u1"), Vec::new(), 1_000);
    let err = order_client
        .place_order(OrderId::from("order_1"), empty)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::ValidationError(_)));

    let err = order_client
        .place_order(OrderId::from("order_2"), draft("u1", "maggi", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::ValidationError(_)));

    order_client
        .place_order(OrderId::from("order_3"), draft("u1", "maggi", 1))
        .await
        .unwrap();
    let err = order_client
        .place_order(OrderId::from("order_3"), draft("u1", "maggi", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::AlreadyExists(_)));

    let err = order_client
        .advance_status(OrderId::from("order_404"), OrderStatus::Preparing)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)));
}

#[tokio::test]
async fn test_orders_for_user_filters_the_store() {
    let (order_actor, order_client) = canteen_core::order_actor::new(8);
    tokio::spawn(order_actor.run(()));

    for (id, user) in [("order_1", "u1"), ("order_2", "u2"), ("order_3", "u1")] {
        order_client
            .place_order(OrderId::from(id), draft(user, "masala-chai", 1))
            .await
            .unwrap();
    }

    let mine: Vec<OrderId> = order_client
        .orders_for_user(&UserId::from("u1"))
        .await
        .unwrap()
        .into_iter()
        .map(|order| order.id)
        .collect();
    assert_eq!(mine, vec![OrderId::from("order_1"), OrderId::from("order_3")]);
}

/// Client-side mapping, with a mocked store.
#[tokio::test]
async fn test_order_client_with_mocked_store() {
    let mut mock = MockClient::<OrderRecord>::new();
    let id = OrderId::from("order_1");

    mock.expect_action(id.clone())
        .return_ok(OrderActionResult::AdvanceStatus {
            status: OrderStatus::Preparing,
            changed: true,
        });
    mock.expect_action(id.clone())
        .return_err(FrameworkError::NotFound(id.to_string()));
    mock.expect_action(id.clone())
        .return_err(FrameworkError::ActorClosed);

    let client = OrderClient::new(mock.client());
    assert!(client.advance_status(id.clone(), OrderStatus::Preparing).await.unwrap());
    assert!(matches!(
        client.set_payment_status(id.clone(), PaymentStatus::Completed).await,
        Err(OrderError::NotFound(_))
    ));
    assert!(matches!(
        client.advance_status(id, OrderStatus::ReadyForPickup).await,
        Err(OrderError::ActorCommunicationError(_))
    ));

    mock.verify();
}

#[tokio::test]
async fn test_payment_status_is_recorded() {
    let (order_actor, order_client) = canteen_core::order_actor::new(8);
    tokio::spawn(order_actor.run(()));

    let id = OrderId::from("order_1");
    let pending = draft("u1", "cold-coffee", 1).paid_with(PaymentMethod::Upi, PaymentStatus::Pending);
    let order = order_client.place_order(id.clone(), pending).await.unwrap();
    assert!(!order.payment_resolved());

    order_client
        .set_payment_status(id.clone(), PaymentStatus::Completed)
        .await
        .unwrap();
    let order = order_client.get(id).await.unwrap().unwrap();
    assert_eq!(order.payment_status, Some(PaymentStatus::Completed));
    assert!(order.payment_resolved());
}
