use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{ItemId, ProfileSeed, UserId, UserPreferenceProfile};
use crate::profile_actor::{ProfileAction, ProfileActionResult, ProfileError};
use crate::recommendation::{default_bundle, CatalogIndex, RecommendationBundle};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Client for the recommendation engine.
///
/// A user without a profile is a normal state, not an error: recommendations
/// fall back to the default bundle and view/tag updates are dropped. Errors
/// are returned only when the profile actor is unreachable.
#[derive(Clone)]
pub struct RecommendationClient {
    inner: ResourceClient<UserPreferenceProfile>,
    index: Arc<CatalogIndex>,
}

impl RecommendationClient {
    pub fn new(inner: ResourceClient<UserPreferenceProfile>, index: Arc<CatalogIndex>) -> Self {
        Self { inner, index }
    }

    /// Recomputes the user's profile from their full order history,
    /// creating it on first use.
    #[instrument(skip(self, seed), fields(orders = seed.orders.len()))]
    pub async fn update_preferences(
        &self,
        user_id: UserId,
        seed: ProfileSeed,
    ) -> Result<UserPreferenceProfile, ProfileError> {
        match self.inner.update(user_id.clone(), seed.clone()).await {
            Err(FrameworkError::NotFound(_)) => {}
            result => return result.map_err(Self::map_error),
        }

        debug!("No profile yet, creating");
        match self.inner.create(user_id.clone(), seed.clone()).await {
            Ok(_) => {}
            // Another caller created it in between.
            Err(FrameworkError::AlreadyExists(_)) => {
                return self.inner.update(user_id, seed).await.map_err(Self::map_error);
            }
            Err(e) => return Err(Self::map_error(e)),
        }

        self.get(user_id.clone())
            .await?
            .ok_or_else(|| ProfileError::UnexpectedResult(format!("profile {user_id} vanished")))
    }

    /// Ranked recommendations, or the default bundle for unknown users.
    #[instrument(skip(self))]
    pub async fn get_recommendations(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<RecommendationBundle, ProfileError> {
        match self
            .inner
            .perform_action(user_id, ProfileAction::Recommend { limit })
            .await
        {
            Ok(ProfileActionResult::Recommend(bundle)) => Ok(*bundle),
            Ok(other) => Err(ProfileError::UnexpectedResult(format!("{other:?}"))),
            Err(e) if e.is_not_found() => {
                debug!("No profile, using default bundle");
                Ok(default_bundle(&self.index))
            }
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Notes that the user looked at an item. No-op for unknown users.
    #[instrument(skip(self))]
    pub async fn record_item_view(&self, user_id: UserId, item_id: ItemId) -> Result<(), ProfileError> {
        self.ignore_missing(user_id, ProfileAction::RecordView(item_id)).await
    }

    /// Adds tags to the user's profile. No-op for unknown users.
    #[instrument(skip(self))]
    pub async fn update_user_tags(&self, user_id: UserId, tags: Vec<String>) -> Result<(), ProfileError> {
        self.ignore_missing(user_id, ProfileAction::AddTags(tags)).await
    }

    async fn ignore_missing(&self, user_id: UserId, action: ProfileAction) -> Result<(), ProfileError> {
        match self.inner.perform_action(user_id, action).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!("No profile, ignoring");
                Ok(())
            }
            Err(e) => Err(Self::map_error(e)),
        }
    }
}

#[async_trait]
impl ActorClient<UserPreferenceProfile> for RecommendationClient {
    type Error = ProfileError;

    fn inner(&self) -> &ResourceClient<UserPreferenceProfile> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ProfileError::ActorCommunicationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecommendationConfig;
    use crate::framework::mock::MockClient;
    use crate::model::Catalog;

    fn index() -> Arc<CatalogIndex> {
        Arc::new(CatalogIndex::new(Arc::new(Catalog::canteen()), RecommendationConfig::default()))
    }

    #[tokio::test]
    async fn test_missing_profile_yields_default_bundle() {
        let mut mock = MockClient::<UserPreferenceProfile>::new();
        mock.expect_action(UserId::from("u1"))
            .return_err(FrameworkError::NotFound("u1".into()));

        let client = RecommendationClient::new(mock.client(), index());
        let bundle = client.get_recommendations(UserId::from("u1"), 5).await.unwrap();

        assert_eq!(bundle, default_bundle(&index()));
        mock.verify();
    }

    #[tokio::test]
    async fn test_missing_profile_makes_view_a_no_op() {
        let mut mock = MockClient::<UserPreferenceProfile>::new();
        mock.expect_action(UserId::from("u1"))
            .return_err(FrameworkError::NotFound("u1".into()));

        let client = RecommendationClient::new(mock.client(), index());
        client
            .record_item_view(UserId::from("u1"), ItemId::from("samosa"))
            .await
            .unwrap();
        mock.verify();
    }

    #[tokio::test]
    async fn test_closed_actor_is_an_error() {
        let mut mock = MockClient::<UserPreferenceProfile>::new();
        mock.expect_action(UserId::from("u1"))
            .return_err(FrameworkError::ActorClosed);

        let client = RecommendationClient::new(mock.client(), index());
        let err = client
            .update_user_tags(UserId::from("u1"), vec!["spicy".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::ActorCommunicationError(_)));
    }

    #[tokio::test]
    async fn test_first_update_creates_profile() {
        let user = UserId::from("u1");
        let mut mock = MockClient::<UserPreferenceProfile>::new();
        mock.expect_update(user.clone())
            .return_err(FrameworkError::NotFound("u1".into()));
        mock.expect_create(user.clone()).return_ok(user.clone());
        mock.expect_get(user.clone())
            .return_ok(Some(UserPreferenceProfile::empty(user.clone())));

        let client = RecommendationClient::new(mock.client(), index());
        let profile = client
            .update_preferences(user.clone(), ProfileSeed::default())
            .await
            .unwrap();
        assert_eq!(profile.user_id, user);
        mock.verify();
    }
}
