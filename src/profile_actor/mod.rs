//! Preference profiles, one per user, and the actions that adjust them.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::RecommendationClient;
use crate::framework::ResourceActor;
use crate::model::UserPreferenceProfile;
use crate::recommendation::CatalogIndex;
use std::sync::Arc;

/// Creates a new Profile actor and its client.
///
/// Run the actor with the same `index` as its context.
pub fn new(
    buffer_size: usize,
    index: Arc<CatalogIndex>,
) -> (ResourceActor<UserPreferenceProfile>, RecommendationClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    let client = RecommendationClient::new(generic_client, index);

    (actor, client)
}
