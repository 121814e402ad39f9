//! Local cache of the remote scheduled-post list.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::backend::PostStore;
use crate::models::post::ScheduledPost;

/// Full-replace cache over `GET /posts`.
///
/// A reload replaces the held list unconditionally — no incremental
/// diffing. On failure the previous list stays intact (stale but
/// available), and the loading flag clears regardless of outcome.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    posts: RwLock<Vec<ScheduledPost>>,
    loading: AtomicBool,
}

impl ScheduleCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the full remote collection and replace the cached list.
    ///
    /// Transport and parse errors are logged and swallowed; callers keep
    /// working against the previous snapshot.
    pub async fn reload(&self, store: &dyn PostStore) {
        self.loading.store(true, Ordering::SeqCst);
        match store.list_posts().await {
            Ok(posts) => {
                debug!(count = posts.len(), "schedule cache reloaded");
                *self.posts.write().await = posts;
            }
            Err(err) => {
                warn!(%err, "schedule reload failed; keeping stale list");
            }
        }
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Clone of the current list, in backend order.
    pub async fn snapshot(&self) -> Vec<ScheduledPost> {
        self.posts.read().await.clone()
    }

    /// Whether a reload is currently in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }
}
