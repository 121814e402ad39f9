//! HTTP client for the backend's LinkedIn proxy endpoints.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::client::expect_status;
use crate::config::BackendConfig;
use crate::models::post::ScheduledPost;
use crate::session::Session;
use crate::{AppError, Result};

/// Client for profile resolution and post submission.
#[derive(Clone)]
pub struct LinkedInClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

#[derive(Deserialize)]
struct ProfileResponse {
    /// External user id of the authenticated member.
    sub: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostRequest<'a> {
    external_user_id: &'a str,
    content: &'a str,
    media_urls: &'a [String],
}

impl LinkedInClient {
    /// Build a client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` if the underlying client cannot be built.
    pub fn new(config: &BackendConfig, session: Session) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            session,
        })
    }

    /// Resolve the authenticated member's external user id (profile field
    /// `sub`).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` when no token is available or the token is
    /// rejected, `AppError::Api` on any other non-success status.
    pub async fn profile_id(&self) -> Result<String> {
        let token = self.require_token().await?;
        let response = self
            .http
            .get(format!("{}/linkedin/profile", self.base_url))
            .bearer_auth(&token)
            .send()
            .await?;
        let profile: ProfileResponse =
            expect_status(response, StatusCode::OK).await?.json().await?;
        Ok(profile.sub)
    }

    /// Submit one post: profile fetch, then creation. Success is exactly
    /// HTTP 201 from the creation call; a failed profile fetch fails the
    /// whole submission.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` when no token is available, `AppError::Api`
    /// for any non-created response.
    pub async fn publish_post(&self, post: &ScheduledPost) -> Result<()> {
        let external_user_id = self.profile_id().await?;
        let token = self.require_token().await?;
        let body = PostRequest {
            external_user_id: &external_user_id,
            content: &post.content,
            media_urls: &post.media_urls,
        };
        let response = self
            .http
            .post(format!("{}/linkedin/post", self.base_url))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        expect_status(response, StatusCode::CREATED).await?;
        debug!(post_id = post.id, "post delivered to linkedin");
        Ok(())
    }

    async fn require_token(&self) -> Result<String> {
        self.session
            .linkedin_token()
            .await
            .ok_or_else(|| AppError::Auth("no linkedin access token".into()))
    }
}
