use crate::clients::{ActorClient, OrderClient, RecommendationClient, TrackingClient};
use crate::config::{CanteenConfig, ConfigError};
use crate::model::{
    Catalog, ItemId, OrderDraft, OrderId, OrderRecord, PaymentStatus, ProfileHint, ProfileSeed,
    Timestamp, UserId, UserPreferenceProfile,
};
use crate::order_actor::OrderError;
use crate::profile_actor::ProfileError;
use crate::recommendation::CatalogIndex;
use crate::tracking::{Clock, SystemClock, TrackingError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// Errors surfaced by [`CanteenSystem`].
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Tracking(#[from] TrackingError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}

/// Owns the three actors of the canteen backend and wires them together.
///
/// - **Order actor**: the order store, keyed by `order_{n}`
/// - **Profile actor**: preference profiles, with the catalog index as context
/// - **Tracking actor**: the status simulator, persisting through the order client
///
/// ```ignore
/// let system = CanteenSystem::with_defaults();
/// let order = system.place_order(draft).await?;
/// let mut updates = system.tracking_client.subscribe_to_order(order.id.clone()).await?;
/// system.shutdown().await?;
/// ```
pub struct CanteenSystem {
    pub order_client: OrderClient,
    pub recommendation_client: RecommendationClient,
    pub tracking_client: TrackingClient,
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
    next_order: AtomicU64,
    /// Shutdown order: tracking first, it holds order clients as listeners.
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl CanteenSystem {
    /// Spawns every actor. Must be called inside a Tokio runtime.
    pub fn new(config: CanteenConfig, catalog: Arc<Catalog>, clock: Arc<dyn Clock>) -> Self {
        let capacity = config.channel_capacity;
        let index = Arc::new(CatalogIndex::new(catalog.clone(), config.recommendation));

        // 1. Create actors
        let (order_actor, order_client) = crate::order_actor::new(capacity);
        let (profile_actor, recommendation_client) = crate::profile_actor::new(capacity, index.clone());
        let (tracking_actor, tracking_client) =
            crate::tracking::new(config.tracking, clock.clone(), capacity);

        // 2. Start actors with injected context
        let order_handle = tokio::spawn(order_actor.run(()));
        let profile_handle = tokio::spawn(profile_actor.run(index));
        let tracking_handle = tokio::spawn(tracking_actor.run());

        info!(items = catalog.items().len(), "Canteen system started");
        Self {
            order_client,
            recommendation_client,
            tracking_client,
            catalog,
            clock,
            next_order: AtomicU64::new(1),
            handles: vec![
                ("tracking", tracking_handle),
                ("profile", profile_handle),
                ("order", order_handle),
            ],
        }
    }

    /// Default configuration, the built-in menu and the system clock.
    pub fn with_defaults() -> Self {
        Self::new(
            CanteenConfig::default(),
            Arc::new(Catalog::canteen()),
            Arc::new(SystemClock),
        )
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now_ms()
    }

    /// Stores the order under a fresh id and starts tracking it if it is
    /// eligible.
    #[instrument(skip(self, draft), fields(user_id = %draft.user_id))]
    pub async fn place_order(&self, draft: OrderDraft) -> Result<OrderRecord, SystemError> {
        let id = OrderId(format!("order_{}", self.next_order.fetch_add(1, Ordering::SeqCst)));
        let order = self.order_client.place_order(id, draft).await?;
        self.track(&order).await?;
        Ok(order)
    }

    /// Records the payment outcome; a completed payment starts tracking.
    #[instrument(skip(self))]
    pub async fn confirm_payment(
        &self,
        order_id: OrderId,
        status: PaymentStatus,
    ) -> Result<OrderRecord, SystemError> {
        self.order_client
            .set_payment_status(order_id.clone(), status)
            .await?;
        let order = self
            .order_client
            .get(order_id.clone())
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;
        self.track(&order).await?;
        Ok(order)
    }

    async fn track(&self, order: &OrderRecord) -> Result<bool, SystemError> {
        let listener = Arc::new(self.order_client.clone());
        Ok(self.tracking_client.start_tracking(order, listener).await?)
    }

    /// Rebuilds the user's profile from every order they have in the store.
    #[instrument(skip(self, hint))]
    pub async fn refresh_recommendations(
        &self,
        user_id: UserId,
        viewed: Vec<ItemId>,
        hint: Option<ProfileHint>,
    ) -> Result<UserPreferenceProfile, SystemError> {
        let orders = self.order_client.orders_for_user(&user_id).await?;
        let seed = ProfileSeed {
            orders,
            viewed,
            hint,
        };
        Ok(self
            .recommendation_client
            .update_preferences(user_id, seed)
            .await?)
    }

    /// Drops every client and waits for the actors to drain.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down canteen system...");

        drop(self.tracking_client);
        drop(self.recommendation_client);
        drop(self.order_client);

        for (name, handle) in self.handles {
            if let Err(e) = handle.await {
                error!(actor = name, "Actor task failed: {:?}", e);
                return Err(SystemError::TaskFailed(format!("{name}: {e}")));
            }
        }

        info!("Canteen system shutdown complete.");
        Ok(())
    }
}
