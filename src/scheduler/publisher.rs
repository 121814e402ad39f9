//! Production [`PostPublisher`] backed by the LinkedIn proxy endpoints.

use std::future::Future;
use std::pin::Pin;

use crate::backend::PostPublisher;
use crate::linkedin::LinkedInClient;
use crate::models::post::ScheduledPost;
use crate::Result;

/// Two-step publisher: resolve the member's external user id, then submit
/// `{externalUserId, content, mediaUrls}`.
#[derive(Clone)]
pub struct LinkedInPublisher {
    client: LinkedInClient,
}

impl LinkedInPublisher {
    /// Wrap a configured LinkedIn client.
    #[must_use]
    pub fn new(client: LinkedInClient) -> Self {
        Self { client }
    }
}

impl PostPublisher for LinkedInPublisher {
    fn publish<'a>(
        &'a self,
        post: &'a ScheduledPost,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(self.client.publish_post(post))
    }
}
