//! # System Lifecycle
//!
//! Starting, wiring and stopping the actors.
//!
//! Actors are created first with no dependencies, then started with their
//! context: the profile actor gets the shared
//! [`CatalogIndex`](crate::recommendation::CatalogIndex), and the tracking
//! actor is handed an [`OrderClient`](crate::clients::OrderClient) per order
//! as its status listener.
//!
//! Shutdown drops every client so each inbox closes, then awaits the tasks.
//! The tracking actor goes first because the order clients it holds keep
//! the order actor alive.
//!
//! [`setup_tracing`] installs the log subscriber.

pub mod canteen_system;
pub mod tracing;

pub use canteen_system::*;
pub use self::tracing::*;
