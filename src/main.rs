//! # Canteen Demo
//!
//! Walks one user through the canteen backend:
//! 1. Setting up the [`CanteenSystem`] from `CANTEEN_*` variables.
//! 2. Asking for recommendations before any order (cold start).
//! 3. Placing a cash order and following it to `Completed`.
//! 4. Refreshing the profile and asking again.
//!
//! ```bash
//! RUST_LOG=info CANTEEN_PLACED_DWELL_MS=300 CANTEEN_PREPARING_DWELL_MS=800 \
//!     CANTEEN_READY_DWELL_MS=1500 cargo run --bin canteen-demo
//! ```

use canteen_core::config::CanteenConfig;
use canteen_core::lifecycle::{setup_tracing, CanteenSystem, SystemError};
use canteen_core::model::{
    Catalog, CatalogItem, ItemId, LineItem, OrderDraft, OrderStatus, PaymentMethod, PaymentStatus,
    ProfileHint, UserId,
};
use canteen_core::notification::{NotificationPreferences, NotificationRelay};
use canteen_core::tracking::SystemClock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = CanteenConfig::from_env()?;
    info!(tracking = ?config.tracking, "Starting canteen demo");

    let system = CanteenSystem::new(config, Arc::new(Catalog::canteen()), Arc::new(SystemClock));
    let user_id = UserId::from("student_42");

    let cold = system
        .recommendation_client
        .get_recommendations(user_id.clone(), 5)
        .await?;
    info!(
        personalized = ?names(&cold.personalized),
        "Cold-start recommendations"
    );

    let (outbound, mut notifications) = mpsc::channel(16);
    let relay = NotificationRelay::start(
        &system.tracking_client,
        NotificationPreferences::default(),
        outbound,
    )
    .await?;

    let draft = {
        let catalog = system.catalog();
        let line = |id: &str, qty| {
            catalog
                .item(&ItemId::from(id))
                .map(|item| LineItem::new(item.clone(), qty))
        };
        let items = [line("samosa", 2), line("masala-chai", 1)]
            .into_iter()
            .flatten()
            .collect();
        OrderDraft::new(user_id.clone(), items, system.now()).paid_with(PaymentMethod::Cash, PaymentStatus::Pending)
    };

    let span = tracing::info_span!("order_processing");
    let order = system.place_order(draft).instrument(span).await?;
    info!(
        order_id = %order.id,
        total = order.total_amount,
        eta = system.tracking_client.estimated_completion_time(&order),
        "Order placed"
    );

    let mut updates = system
        .tracking_client
        .subscribe_to_order(order.id.clone())
        .await?;
    while let Some(update) = updates.recv().await {
        info!(status = %update.status, message = %update.message, "Order update");
        if update.status == OrderStatus::Completed {
            break;
        }
    }

    while let Ok(notification) = notifications.try_recv() {
        let payload = notification.payload();
        info!(title = %payload.title, body = %payload.body, "Notification");
    }

    let profile = system
        .refresh_recommendations(
            user_id.clone(),
            vec![ItemId::from("vada-pav")],
            Some(ProfileHint {
                tags: vec!["spicy".to_string(), "crispy".to_string()],
            }),
        )
        .await?;
    info!(dietary_mode = ?profile.dietary_mode, "Profile refreshed");

    let bundle = system
        .recommendation_client
        .get_recommendations(user_id, 5)
        .await?;
    info!(
        personalized = ?names(&bundle.personalized),
        similar = ?names(&bundle.similar_to_last_ordered),
        "Personalized recommendations"
    );

    // Shutdown system gracefully
    system.shutdown().await?;
    let forwarded = relay.join().await;
    if forwarded == 0 {
        warn!("No notifications were forwarded");
    }

    info!(forwarded, "Demo completed successfully");
    Ok(())
}

fn names(items: &[CatalogItem]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}
