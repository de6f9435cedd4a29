use crate::{
    config::AppConfig,
    services::{ContentResolver, SubscriptionHandler},
    store::{LocalStore, PostStore, RemoteStore, StoreError, SubscriberStore},
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::{num::NonZeroU32, sync::Arc};
use tracing::{info, warn};

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// Store chains are built once here and passed into the services; handlers
/// never reach a store directly.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ContentResolver>,
    pub subscriptions: Arc<SubscriptionHandler>,
    pub subscribe_limiter: Arc<DefaultDirectRateLimiter>,
    pub remote_configured: bool,
}

impl AppState {
    pub fn new(
        post_stores: Vec<Arc<dyn PostStore>>,
        subscriber_stores: Vec<Arc<dyn SubscriberStore>>,
        subscribe_rate_per_minute: u32,
        remote_configured: bool,
    ) -> Self {
        let rate = NonZeroU32::new(subscribe_rate_per_minute).unwrap_or(NonZeroU32::MIN);

        Self {
            resolver: Arc::new(ContentResolver::new(post_stores)),
            subscriptions: Arc::new(SubscriptionHandler::new(subscriber_stores)),
            subscribe_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(rate))),
            remote_configured,
        }
    }

    /// Remote store first when configured, local store always last.
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let local = Arc::new(LocalStore::new(&config.local_dir));
        info!("Local fallback store at {}", local.dir().display());

        let mut post_stores: Vec<Arc<dyn PostStore>> = Vec::new();
        let mut subscriber_stores: Vec<Arc<dyn SubscriberStore>> = Vec::new();

        match &config.remote {
            Some(remote_config) => {
                let remote = Arc::new(RemoteStore::new(remote_config)?);
                info!("Remote store at {}", remote_config.url);
                post_stores.push(remote.clone());
                subscriber_stores.push(remote);
            }
            None => warn!("Remote store not configured, serving from local store only"),
        }

        post_stores.push(local.clone());
        subscriber_stores.push(local);

        Ok(Self::new(
            post_stores,
            subscriber_stores,
            config.subscribe_rate_per_minute,
            config.remote.is_some(),
        ))
    }
}
