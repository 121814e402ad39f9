//! Scraped and generated idea models.

use serde::{Deserialize, Serialize};

/// Content item ingested from an external social platform, stored by the
/// backend for later reuse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapedIdea {
    /// Unique record identifier.
    pub id: String,
    /// Headline shown in listings and searched against.
    pub title: String,
    /// Source platform name (e.g. `LinkedIn`, `Twitter`).
    pub platform: String,
    /// Original author handle or display name.
    pub author: String,
    /// Ingestion timestamp as stored by the scraper.
    pub created_at: String,
    /// Comma-separated hashtag list as scraped.
    #[serde(default)]
    pub hashtags: String,
    /// Body text captured from the source post.
    pub selected_text: String,
    /// Optional image captured alongside the text.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Derivative post copy produced by the chat-completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedIdea {
    /// Generated text body.
    pub content: String,
    /// Scraped ideas the copy was derived from.
    #[serde(default)]
    pub source_ids: Vec<String>,
    /// Owning user identifier.
    pub user_id: String,
}

/// Authenticated backend user, from `GET /auth/current-user`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendUser {
    /// User identifier; used as the scheduling `user_id`.
    pub id: String,
}
