//! Generic actor framework for keyed resources.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - trait a resource implements to be owned by an actor
//! - [`ResourceActor`] - the task that owns a keyed store of entities
//! - [`ResourceClient`] - cloneable async handle for talking to the actor
//! - [`FrameworkError`] - plumbing failures (closed actor, unknown id, ...)
//!
//! # Testing
//!
//! See [`mock`] for utilities to test clients without spawning full actors.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
