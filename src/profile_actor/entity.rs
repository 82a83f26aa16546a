//! [`ActorEntity`] implementation for [`UserPreferenceProfile`].
//!
//! Every hook receives the shared [`CatalogIndex`] as context, which carries
//! the catalog and the recommendation tuning.

use super::actions::{ProfileAction, ProfileActionResult};
use super::error::ProfileError;
use crate::framework::ActorEntity;
use crate::model::{ProfileSeed, UserId, UserPreferenceProfile};
use crate::recommendation::{derive_profile, merge_tags, recommend, record_view, CatalogIndex};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

#[async_trait]
impl ActorEntity for UserPreferenceProfile {
    type Id = UserId;
    type Create = ProfileSeed;
    /// A fresh seed; the profile is recomputed rather than patched.
    type Update = ProfileSeed;
    type Action = ProfileAction;
    type ActionResult = ProfileActionResult;
    type Context = Arc<CatalogIndex>;
    type Error = ProfileError;

    fn from_create_params(
        id: UserId,
        seed: ProfileSeed,
        index: &Arc<CatalogIndex>,
    ) -> Result<Self, ProfileError> {
        Ok(derive_profile(id, seed, None, index.config()))
    }

    async fn on_update(&mut self, seed: ProfileSeed, index: &Arc<CatalogIndex>) -> Result<(), ProfileError> {
        let next = derive_profile(self.user_id.clone(), seed, Some(&*self), index.config());
        debug!(
            user_id = %self.user_id,
            dietary_mode = ?next.dietary_mode,
            items = next.item_weights.len(),
            "Profile recomputed"
        );
        *self = next;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ProfileAction,
        index: &Arc<CatalogIndex>,
    ) -> Result<ProfileActionResult, ProfileError> {
        match action {
            ProfileAction::RecordView(item_id) => Ok(ProfileActionResult::RecordView(record_view(
                self,
                item_id,
                index.config().viewed_cap,
            ))),
            ProfileAction::AddTags(tags) => {
                merge_tags(self, tags);
                Ok(ProfileActionResult::AddTags(self.tags.clone()))
            }
            ProfileAction::Recommend { limit } => Ok(ProfileActionResult::Recommend(Box::new(
                recommend(Some(&*self), index, limit),
            ))),
        }
    }
}
