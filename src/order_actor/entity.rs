//! [`ActorEntity`] implementation for [`OrderRecord`].

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use crate::framework::ActorEntity;
use crate::model::{OrderDraft, OrderId, OrderRecord, OrderStatus};
use crate::tracking::next_state;
use async_trait::async_trait;
use tracing::info;

#[async_trait]
impl ActorEntity for OrderRecord {
    type Id = OrderId;
    type Create = OrderDraft;
    /// Placed orders are only changed through actions.
    type Update = ();
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = ();
    type Error = OrderError;

    fn from_create_params(id: OrderId, draft: OrderDraft, _ctx: &()) -> Result<Self, OrderError> {
        if draft.items.is_empty() {
            return Err(OrderError::ValidationError(format!("{id} has no line items")));
        }
        if let Some(line) = draft.items.iter().find(|line| line.quantity == 0) {
            return Err(OrderError::ValidationError(format!(
                "{id}: quantity of {} must be positive",
                line.item.id
            )));
        }
        Ok(OrderRecord::place(id, draft))
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), OrderError> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &(),
    ) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::AdvanceStatus(to) => {
                if to == self.status {
                    return Ok(OrderActionResult::AdvanceStatus {
                        status: to,
                        changed: false,
                    });
                }
                if next_state(self.status) != Some(to) {
                    return Err(OrderError::InvalidTransition {
                        from: self.status,
                        to,
                    });
                }
                info!(order_id = %self.id, from = %self.status, %to, "Status advanced");
                self.status = to;
                Ok(OrderActionResult::AdvanceStatus {
                    status: to,
                    changed: true,
                })
            }
            OrderAction::SetPaymentStatus(status) => {
                self.payment_status = Some(status);
                Ok(OrderActionResult::SetPaymentStatus(status))
            }
        }
    }
}
