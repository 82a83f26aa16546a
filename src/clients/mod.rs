//! Type-safe wrappers around the actors.

pub mod actor_client;
pub mod order_client;
pub mod recommendation_client;
pub mod tracking_client;

pub use actor_client::*;
pub use order_client::*;
pub use recommendation_client::*;
pub use tracking_client::*;
