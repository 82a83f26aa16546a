//! # The Entity Contract
//!
//! [`ActorEntity`] is what a stored resource (an order, a preference profile)
//! implements so a [`ResourceActor`](crate::framework::ResourceActor) can own it.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// # Architecture Note
/// Orders and preference profiles are very different things, but both are
/// "a value keyed by an id, created once, then mutated by a small set of
/// domain actions". The actor loop is shared and only the rules differ.
///
/// Ids are supplied by the caller. Orders arrive from checkout with an id
/// already assigned, and profiles are keyed by the user they describe, so the
/// actor never invents identifiers.
///
/// # Async & Context
/// The `Context` associated type is injected into every hook, including
/// construction. The profile actor uses it to reach the shared catalog index
/// and recommendation tuning without each profile carrying a copy.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity. `Ord` keeps listings deterministic.
    type Id: Eq + Ord + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g. `AdvanceStatus`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity, e.g. `OrderError`.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full entity from its id and creation payload.
    fn from_create_params(
        id: Self::Id,
        params: Self::Create,
        ctx: &Self::Context,
    ) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction, before the entity is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
