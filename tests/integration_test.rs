use canteen_core::config::CanteenConfig;
use canteen_core::lifecycle::CanteenSystem;
use canteen_core::model::{
    Catalog, DietaryMode, ItemId, LineItem, OrderDraft, OrderStatus, PaymentMethod, PaymentStatus,
    ProfileHint, UserId,
};
use canteen_core::notification::{Notification, NotificationPreferences, NotificationRelay};
use canteen_core::tracking::ManualClock;
use std::sync::Arc;
use tokio::sync::mpsc;

fn draft(system: &CanteenSystem, user: &str, lines: &[(&str, u32)]) -> OrderDraft {
    let items = lines
        .iter()
        .map(|(id, qty)| LineItem::new(system.catalog().item(&ItemId::from(*id)).unwrap().clone(), *qty))
        .collect();
    OrderDraft::new(UserId::from(user), items, system.now())
        .paid_with(PaymentMethod::Wallet, PaymentStatus::Completed)
}

/// Full end-to-end run with every real actor: an order is placed, tracked to
/// completion, relayed as notifications and fed back into recommendations.
#[tokio::test(start_paused = true)]
async fn test_full_canteen_system_integration() {
    let system = CanteenSystem::new(
        CanteenConfig::default(),
        Arc::new(Catalog::canteen()),
        Arc::new(ManualClock::new(1_700_000_000_000)),
    );
    let user = UserId::from("u1");

    let (outbound, mut notifications) = mpsc::channel(8);
    let relay = NotificationRelay::start(
        &system.tracking_client,
        NotificationPreferences::default(),
        outbound,
    )
    .await
    .expect("Failed to start relay");

    let order = system
        .place_order(draft(&system, "u1", &[("chicken-biryani", 3), ("masala-chai", 1)]))
        .await
        .expect("Failed to place order");
    assert_eq!(order.total_amount, 375.0);

    let mut statuses = Vec::new();
    while let Some(notification) = notifications.recv().await {
        let Notification::OrderUpdate(update) = &notification else {
            panic!("unexpected notification {notification:?}");
        };
        assert_eq!(update.order_id, order.id);
        let payload = notification.payload();
        assert!(payload.url.ends_with(order.id.as_str()));
        statuses.push(update.status);
        if update.status == OrderStatus::Completed {
            break;
        }
    }
    assert_eq!(
        statuses,
        vec![OrderStatus::Preparing, OrderStatus::ReadyForPickup, OrderStatus::Completed]
    );

    let profile = system
        .refresh_recommendations(
            user.clone(),
            vec![ItemId::from("cold-coffee")],
            Some(ProfileHint {
                tags: vec!["chicken".to_string()],
            }),
        )
        .await
        .expect("Failed to refresh recommendations");
    assert_eq!(profile.dietary_mode, DietaryMode::NonVegetarianOnly);
    assert_eq!(
        profile.last_ordered,
        vec![ItemId::from("chicken-biryani"), ItemId::from("masala-chai")]
    );

    let bundle = system
        .recommendation_client
        .get_recommendations(user, 5)
        .await
        .expect("Failed to get recommendations");
    assert!(bundle.personalized.iter().all(|item| !item.is_veg));

    system.shutdown().await.expect("Shutdown failed");
    assert_eq!(relay.join().await, 3);
}

#[tokio::test]
async fn test_order_updates_can_be_muted() {
    let system = CanteenSystem::with_defaults();
    let (outbound, mut notifications) = mpsc::channel(8);
    let preferences = NotificationPreferences {
        order_updates: false,
        ..NotificationPreferences::default()
    };
    let relay = NotificationRelay::start(&system.tracking_client, preferences, outbound)
        .await
        .unwrap();

    system.shutdown().await.unwrap();
    assert_eq!(relay.join().await, 0);
    assert!(notifications.recv().await.is_none());
}
