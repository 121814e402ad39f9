//! Typed `reqwest` wrapper over the backend REST contract.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BackendConfig;
use crate::models::idea::{BackendUser, GeneratedIdea, ScrapedIdea};
use crate::models::post::{NewPost, PostStatus, ScheduledPost};
use crate::session::Session;
use crate::{AppError, Result};

use super::PostStore;

/// HTTP client for the scraped-data / posts / auth backend.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

#[derive(Serialize)]
struct StatusBody<'a> {
    status: &'a str,
}

#[derive(Deserialize)]
struct SignInResponse {
    token: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    urls: Vec<String>,
}

impl BackendClient {
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

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Exchange credentials for a backend bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the backend rejects the credentials.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String> {
        let response = self
            .http
            .post(self.url("/auth/sign-in"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body: SignInResponse = expect_status(response, StatusCode::OK).await?.json().await?;
        Ok(body.token)
    }

    /// Fetch the authenticated backend user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` on a 401, `AppError::Api` on any other
    /// non-success status.
    pub async fn current_user(&self) -> Result<BackendUser> {
        let response = self
            .http
            .get(self.url("/auth/current-user"))
            .bearer_auth(self.session.access_token())
            .send()
            .await?;
        Ok(expect_status(response, StatusCode::OK).await?.json().await?)
    }

    /// Read the full scheduled-post collection.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` or `AppError::Api` on failure.
    pub async fn list_posts(&self) -> Result<Vec<ScheduledPost>> {
        let response = self.http.get(self.url("/posts")).send().await?;
        Ok(expect_status(response, StatusCode::OK).await?.json().await?)
    }

    /// Create a scheduled post. Success is HTTP 201.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the backend answers with anything but 201.
    pub async fn add_post(&self, post: &NewPost) -> Result<()> {
        let response = self
            .http
            .post(self.url("/posts/add"))
            .json(post)
            .send()
            .await?;
        expect_status(response, StatusCode::CREATED).await?;
        Ok(())
    }

    /// Transition a post's status. Success is HTTP 200.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the backend answers with anything but 200.
    pub async fn set_post_status(&self, post_id: &str, status: PostStatus) -> Result<()> {
        let response = self
            .http
            .put(self.url(&format!("/posts/{post_id}")))
            .json(&StatusBody {
                status: status.as_str(),
            })
            .send()
            .await?;
        expect_status(response, StatusCode::OK).await?;
        debug!(post_id, status = status.as_str(), "post status updated");
        Ok(())
    }

    /// List scraped ideas.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` or `AppError::Api` on failure.
    pub async fn scraped_ideas(&self) -> Result<Vec<ScrapedIdea>> {
        let response = self.http.get(self.url("/scraped-data")).send().await?;
        Ok(expect_status(response, StatusCode::OK).await?.json().await?)
    }

    /// Delete a scraped idea by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` on a 404, `AppError::Api` otherwise.
    pub async fn delete_scraped_idea(&self, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/scraped-data/{id}")))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("scraped idea {id}")));
        }
        expect_status(response, StatusCode::OK).await?;
        Ok(())
    }

    /// Persist generated post copy. Success is HTTP 201.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the backend answers with anything but 201.
    pub async fn save_generated_idea(&self, idea: &GeneratedIdea) -> Result<()> {
        let response = self
            .http
            .post(self.url("/generated-idea/add"))
            .json(idea)
            .send()
            .await?;
        expect_status(response, StatusCode::CREATED).await?;
        Ok(())
    }

    /// Upload media as a prepared multipart form; the response lists the
    /// stored relative URLs in upload order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` on a non-success status.
    pub async fn upload_media(&self, form: reqwest::multipart::Form) -> Result<Vec<String>> {
        let response = self
            .http
            .post(self.url("/generated-idea/upload-media"))
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = expect_status(response, StatusCode::OK).await?.json().await?;
        Ok(body.urls)
    }
}

impl PostStore for BackendClient {
    fn list_posts(&self) -> Pin<Box<dyn Future<Output = Result<Vec<ScheduledPost>>> + Send + '_>> {
        Box::pin(Self::list_posts(self))
    }

    fn update_status<'a>(
        &'a self,
        post_id: &'a str,
        status: PostStatus,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(self.set_post_status(post_id, status))
    }
}

/// Map a response to `AppError::Auth` on 401 or `AppError::Api` when the
/// status differs from the contract's success code.
pub(crate) async fn expect_status(response: Response, expected: StatusCode) -> Result<Response> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED {
        return Err(AppError::Auth(format!("token rejected: {body}")));
    }
    Err(AppError::Api {
        status: status.as_u16(),
        body,
    })
}
