//! Orders as held by the order store.
//!
//! # Actor Framework
//! [`OrderRecord`] implements [`ActorEntity`](crate::framework::ActorEntity)
//! in [`crate::order_actor`]. Creation takes an [`OrderDraft`]; the store fills
//! in the id, the aggregate total and the initial `Placed` status.

use crate::model::catalog::{CatalogItem, CustomizationOption};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

string_id!(
    /// Order identifier, e.g. `order_1`. Assigned by the caller at checkout.
    OrderId
);

string_id!(
    /// Identifier of the user who owns orders and a preference profile.
    UserId
);

/// Lifecycle status of an order.
///
/// Strictly linear: `Placed → Preparing → Ready for Pickup → Completed`.
/// `Unrecognized` absorbs labels written by something else into external
/// storage; it has no position in the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Placed,
    Preparing,
    #[serde(rename = "Ready for Pickup")]
    ReadyForPickup,
    Completed,
    #[serde(other)]
    Unrecognized,
}

impl OrderStatus {
    /// Position in the lifecycle, `None` for `Unrecognized`.
    pub fn stage(self) -> Option<u8> {
        match self {
            Self::Placed => Some(0),
            Self::Preparing => Some(1),
            Self::ReadyForPickup => Some(2),
            Self::Completed => Some(3),
            Self::Unrecognized => None,
        }
    }

    /// True when this status is at or past `other` in the lifecycle.
    pub fn has_reached(self, other: OrderStatus) -> bool {
        matches!((self.stage(), other.stage()), (Some(a), Some(b)) if a >= b)
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Placed => "Placed",
            Self::Preparing => "Preparing",
            Self::ReadyForPickup => "Ready for Pickup",
            Self::Completed => "Completed",
            Self::Unrecognized => "Unrecognized",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Wallet,
    Cash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// The option picked from one customization group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChosenCustomization {
    pub group: String,
    pub option: CustomizationOption,
}

/// A catalog item snapshot with quantity and chosen customizations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub item: CatalogItem,
    pub quantity: u32,
    #[serde(default)]
    pub customizations: Vec<ChosenCustomization>,
    pub line_total: f64,
}

impl LineItem {
    pub fn new(item: CatalogItem, quantity: u32) -> Self {
        Self::customized(item, quantity, Vec::new())
    }

    /// Line total is `(price + Σ option deltas) × quantity`.
    pub fn customized(
        item: CatalogItem,
        quantity: u32,
        customizations: Vec<ChosenCustomization>,
    ) -> Self {
        let unit = item.price + customizations.iter().map(|c| c.option.price).sum::<f64>();
        Self {
            line_total: unit * f64::from(quantity),
            item,
            quantity,
            customizations,
        }
    }
}

/// Payload for placing a new order.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub user_id: UserId,
    pub items: Vec<LineItem>,
    pub timestamp: Timestamp,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
    pub special_instructions: Option<String>,
}

impl OrderDraft {
    pub fn new(user_id: UserId, items: Vec<LineItem>, timestamp: Timestamp) -> Self {
        Self {
            user_id,
            items,
            timestamp,
            payment_method: None,
            payment_status: None,
            special_instructions: None,
        }
    }

    pub fn paid_with(mut self, method: PaymentMethod, status: PaymentStatus) -> Self {
        self.payment_method = Some(method);
        self.payment_status = Some(status);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<LineItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl OrderRecord {
    /// Builds a freshly placed order from a draft.
    pub fn place(id: OrderId, draft: OrderDraft) -> Self {
        let total_amount = draft.items.iter().map(|line| line.line_total).sum();
        Self {
            id,
            user_id: draft.user_id,
            items: draft.items,
            total_amount,
            status: OrderStatus::Placed,
            timestamp: draft.timestamp,
            payment_method: draft.payment_method,
            payment_status: draft.payment_status,
            special_instructions: draft.special_instructions,
        }
    }

    /// Cash settles at the counter; every other method needs a completed payment.
    pub fn payment_resolved(&self) -> bool {
        self.payment_method == Some(PaymentMethod::Cash)
            || self.payment_status == Some(PaymentStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::{Catalog, ItemId};

    #[test]
    fn test_status_json_labels() {
        let json = serde_json::to_string(&OrderStatus::ReadyForPickup).unwrap();
        assert_eq!(json, "\"Ready for Pickup\"");

        let parsed: OrderStatus = serde_json::from_str("\"Preparing\"").unwrap();
        assert_eq!(parsed, OrderStatus::Preparing);

        let unknown: OrderStatus = serde_json::from_str("\"Cancelled\"").unwrap();
        assert_eq!(unknown, OrderStatus::Unrecognized);
    }

    #[test]
    fn test_has_reached_ignores_unrecognized() {
        assert!(OrderStatus::Completed.has_reached(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.has_reached(OrderStatus::Preparing));
        assert!(!OrderStatus::Placed.has_reached(OrderStatus::Preparing));
        assert!(!OrderStatus::Unrecognized.has_reached(OrderStatus::Placed));
    }

    #[test]
    fn test_line_and_order_totals() {
        let catalog = Catalog::canteen();
        let biryani = catalog.item(&ItemId::from("chicken-biryani")).unwrap().clone();
        let half = biryani.customizations[0].options[0].clone();
        let line = LineItem::customized(
            biryani,
            2,
            vec![ChosenCustomization {
                group: "Portion Size".into(),
                option: half,
            }],
        );
        assert_eq!(line.line_total, 180.0);

        let chai = catalog.item(&ItemId::from("masala-chai")).unwrap().clone();
        let draft = OrderDraft::new(UserId::from("u1"), vec![line, LineItem::new(chai, 1)], 0);
        let order = OrderRecord::place(OrderId::from("order_1"), draft);
        assert_eq!(order.total_amount, 195.0);
        assert_eq!(order.status, OrderStatus::Placed);
    }

    #[test]
    fn test_payment_resolution() {
        let mut order = OrderRecord::place(
            OrderId::from("order_1"),
            OrderDraft::new(UserId::from("u1"), Vec::new(), 0),
        );
        assert!(!order.payment_resolved());

        order.payment_method = Some(PaymentMethod::Cash);
        assert!(order.payment_resolved());

        order.payment_method = Some(PaymentMethod::Upi);
        order.payment_status = Some(PaymentStatus::Pending);
        assert!(!order.payment_resolved());

        order.payment_status = Some(PaymentStatus::Completed);
        assert!(order.payment_resolved());
    }
}
