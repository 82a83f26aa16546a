//! # Generic Messages
//!
//! Request envelopes sent from a [`ResourceClient`](crate::framework::ResourceClient)
//! to its [`ResourceActor`](crate::framework::ResourceActor).

use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// Entities live as long as their actor, so there is no delete. The variants
/// cover create, read and update, a `List` for scans such as "all orders of this user", and an
/// `Action` escape hatch for domain operations that are not plain CRUD
/// (advancing an order's status, recording an item view).
///
/// Every payload is typed by the entity's associated types, so an order
/// payload can never be delivered to the profile actor.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        id: T::Id,
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

impl<T: ActorEntity> ResourceRequest<T> {
    /// Short operation name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create { .. } => "Create",
            Self::Get { .. } => "Get",
            Self::List { .. } => "List",
            Self::Update { .. } => "Update",
            Self::Action { .. } => "Action",
        }
    }
}
