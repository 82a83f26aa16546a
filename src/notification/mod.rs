//! Typed notifications and the relay that turns order updates into them.
//!
//! Delivery (push, e-mail) is not handled here. [`NotificationRelay`] only
//! decides what to send and hands it to an outbound channel.

use crate::clients::TrackingClient;
use crate::model::ItemId;
use crate::tracking::{OrderStatusUpdate, TrackingError};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Notification {
    NewItem {
        item_id: ItemId,
        name: String,
        description: String,
    },
    EndingSoon {
        item_id: ItemId,
        name: String,
        hours_left: u32,
    },
    Promotion {
        title: String,
        description: String,
        discount_percentage: Option<u32>,
    },
    OrderUpdate(OrderStatusUpdate),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

/// What a delivery channel renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub tag: String,
    pub url: String,
    pub actions: Vec<NotificationAction>,
}

fn actions(pairs: &[(&str, &str)]) -> Vec<NotificationAction> {
    pairs
        .iter()
        .map(|(action, title)| NotificationAction {
            action: action.to_string(),
            title: title.to_string(),
        })
        .collect()
}

impl Notification {
    pub fn payload(&self) -> NotificationPayload {
        match self {
            Self::NewItem {
                item_id,
                name,
                description,
            } => NotificationPayload {
                title: "🌟 New Seasonal Special!".to_string(),
                body: format!("{name} is now available! {description}"),
                tag: format!("new-item-{item_id}"),
                url: "/#seasonal-specials".to_string(),
                actions: actions(&[("view", "View Item"), ("dismiss", "Dismiss")]),
            },
            Self::EndingSoon {
                item_id,
                name,
                hours_left,
            } => NotificationPayload {
                title: "⏰ Last Chance!".to_string(),
                body: format!("{name} ends in {hours_left} hours. Order now!"),
                tag: format!("ending-{item_id}"),
                url: "/#seasonal-specials".to_string(),
                actions: actions(&[("order", "Order Now"), ("dismiss", "Dismiss")]),
            },
            Self::Promotion {
                title,
                description,
                discount_percentage,
            } => NotificationPayload {
                title: format!("🎉 {title}"),
                body: match discount_percentage {
                    Some(pct) => format!("{description} Get {pct}% off!"),
                    None => description.clone(),
                },
                tag: "promotion".to_string(),
                url: "/#seasonal-specials".to_string(),
                actions: actions(&[("view", "View Offers"), ("dismiss", "Dismiss")]),
            },
            Self::OrderUpdate(update) => NotificationPayload {
                title: format!("Order {}", update.status),
                body: update.message.clone(),
                tag: format!("order-{}", update.order_id),
                url: format!("/orders/{}", update.order_id),
                actions: actions(&[("track", "Track Order")]),
            },
        }
    }
}

/// Which kinds of notification a user wants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub push_enabled: bool,
    pub email_enabled: bool,
    pub new_seasonal_items: bool,
    pub ending_items: bool,
    pub promotions: bool,
    pub order_updates: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            push_enabled: false,
            email_enabled: false,
            new_seasonal_items: true,
            ending_items: true,
            promotions: true,
            order_updates: true,
        }
    }
}

impl NotificationPreferences {
    /// Gates by kind only; channel flags are for the delivery side.
    pub fn allows(&self, notification: &Notification) -> bool {
        match notification {
            Notification::NewItem { .. } => self.new_seasonal_items,
            Notification::EndingSoon { .. } => self.ending_items,
            Notification::Promotion { .. } => self.promotions,
            Notification::OrderUpdate(_) => self.order_updates,
        }
    }
}

/// Forwards every order status update as a [`Notification::OrderUpdate`].
pub struct NotificationRelay {
    handle: JoinHandle<usize>,
}

impl NotificationRelay {
    /// Subscribes to all orders and starts forwarding.
    ///
    /// Runs until the tracker shuts down or `outbound` is closed.
    pub async fn start(
        tracking: &TrackingClient,
        preferences: NotificationPreferences,
        outbound: mpsc::Sender<Notification>,
    ) -> Result<Self, TrackingError> {
        let mut subscription = tracking.subscribe_to_all_orders().await?;
        let handle = tokio::spawn(async move {
            let mut forwarded = 0;
            while let Some(update) = subscription.recv().await {
                let notification = Notification::OrderUpdate(update);
                if !preferences.allows(&notification) {
                    debug!("Order updates disabled, skipping");
                    continue;
                }
                if outbound.send(notification).await.is_err() {
                    break;
                }
                forwarded += 1;
            }
            info!(forwarded, "Notification relay stopped");
            forwarded
        });
        Ok(Self { handle })
    }

    /// Waits for the relay to stop and returns how many notifications it sent.
    pub async fn join(self) -> usize {
        self.handle.await.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderId, OrderStatus};

    #[test]
    fn test_promotion_payload() {
        let promo = Notification::Promotion {
            title: "Exam Week".into(),
            description: "Fuel up for finals.".into(),
            discount_percentage: Some(20),
        };
        let payload = promo.payload();
        assert_eq!(payload.title, "🎉 Exam Week");
        assert_eq!(payload.body, "Fuel up for finals. Get 20% off!");
        assert_eq!(payload.tag, "promotion");
    }

    #[test]
    fn test_order_update_payload() {
        let update = OrderStatusUpdate::new(OrderId::from("order_7"), OrderStatus::ReadyForPickup, 0);
        let payload = Notification::OrderUpdate(update).payload();
        assert_eq!(payload.title, "Order Ready for Pickup");
        assert_eq!(payload.body, "Your order is ready! Please come to the pickup counter");
        assert_eq!(payload.tag, "order-order_7");
    }

    #[test]
    fn test_preferences_gate_by_kind() {
        let mut prefs = NotificationPreferences::default();
        let ending = Notification::EndingSoon {
            item_id: ItemId::from("samosa"),
            name: "Crispy Samosa".into(),
            hours_left: 2,
        };
        assert!(prefs.allows(&ending));
        prefs.ending_items = false;
        assert!(!prefs.allows(&ending));
    }

    #[test]
    fn test_notification_json_is_tagged() {
        let json = serde_json::to_value(Notification::NewItem {
            item_id: ItemId::from("samosa"),
            name: "Crispy Samosa".into(),
            description: "Now with mint chutney".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "new-item");
        assert_eq!(json["item_id"], "samosa");
    }
}
