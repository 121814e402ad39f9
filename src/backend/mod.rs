//! Backend REST surface and the trait seams the scheduler consumes.
//!
//! The [`PostStore`] and [`PostPublisher`] traits decouple the publish-due
//! scanner from HTTP so its logic can be exercised against in-memory fakes.
//! Production wiring is [`client::BackendClient`] for storage and
//! [`crate::scheduler::publisher::LinkedInPublisher`] for delivery.

pub mod client;

use std::future::Future;
use std::pin::Pin;

use crate::models::post::{PostStatus, ScheduledPost};
use crate::Result;

/// Remote store of scheduled posts.
pub trait PostStore: Send + Sync {
    /// Read the full remote collection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Http`](crate::AppError::Http) on transport failure
    /// or [`AppError::Api`](crate::AppError::Api) on a non-success status.
    fn list_posts(&self) -> Pin<Box<dyn Future<Output = Result<Vec<ScheduledPost>>> + Send + '_>>;

    /// Partial-update a post's status field.
    ///
    /// Success is HTTP 200. There is no optimistic local mutation — state is
    /// authoritative only after the next full reload.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Api`](crate::AppError::Api) if the backend answers
    /// with anything but 200.
    fn update_status<'a>(
        &'a self,
        post_id: &'a str,
        status: PostStatus,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Delivery channel for due posts.
pub trait PostPublisher: Send + Sync {
    /// Submit one post to the external platform.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Auth`](crate::AppError::Auth) if no access token
    /// is available, and [`AppError::Api`](crate::AppError::Api) for any
    /// non-created response. A failure affects this post only.
    fn publish<'a>(
        &'a self,
        post: &'a ScheduledPost,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}
