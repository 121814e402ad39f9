//! Status transitions and cache refresh after publish or cancel.

use std::sync::Arc;

use tracing::info;

use crate::backend::PostStore;
use crate::models::post::PostStatus;
use crate::scheduler::cache::ScheduleCache;
use crate::Result;

/// Applies status transitions on the backend and re-syncs the cache.
///
/// There is no optimistic local mutation: the reload after the remote
/// update is the only mechanism that removes a published or cancelled post
/// from the due set.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn PostStore>,
    cache: Arc<ScheduleCache>,
}

impl Reconciler {
    /// Wire a reconciler to the store and cache it maintains.
    #[must_use]
    pub fn new(store: Arc<dyn PostStore>, cache: Arc<ScheduleCache>) -> Self {
        Self { store, cache }
    }

    /// Transition a post's status remotely, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the remote update fails; the reload
    /// after a successful update never fails (stale-on-failure policy).
    pub async fn set_status(&self, post_id: &str, status: PostStatus) -> Result<()> {
        self.store.update_status(post_id, status).await?;
        info!(post_id, status = status.as_str(), "post status transitioned");
        self.cache.reload(self.store.as_ref()).await;
        Ok(())
    }

    /// Manual, user-triggered cancellation: sets `cancelled` without a
    /// publish call.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the remote update fails.
    pub async fn cancel(&self, post_id: &str) -> Result<()> {
        self.set_status(post_id, PostStatus::Cancelled).await
    }
}
