//! Order store: placed orders and their lifecycle status.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::OrderClient;
use crate::framework::ResourceActor;
use crate::model::OrderRecord;

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<OrderRecord>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    let client = OrderClient::new(generic_client);

    (actor, client)
}
