//! Injected session state shared by the HTTP clients and the scanner.
//!
//! The original dashboard read its tokens from the browser's ambient
//! key-value store at every call site. Here the tokens live in one explicit
//! [`Session`] object that is constructed at startup and passed to the
//! components that need it; the OAuth return path delivers the LinkedIn
//! token through [`Session::set_linkedin_token`] instead of ambient lookups.

use std::sync::Arc;

use tokio::sync::RwLock;

/// Shared session state: backend bearer token plus the optional LinkedIn
/// access token.
#[derive(Debug, Clone)]
pub struct Session {
    access_token: Arc<str>,
    linkedin_token: Arc<RwLock<Option<String>>>,
}

impl Session {
    /// Construct a session from tokens loaded at startup.
    #[must_use]
    pub fn new(access_token: String, linkedin_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            linkedin_token: Arc::new(RwLock::new(linkedin_token)),
        }
    }

    /// Bearer token for backend calls.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Current LinkedIn access token, if the OAuth round-trip completed.
    pub async fn linkedin_token(&self) -> Option<String> {
        self.linkedin_token.read().await.clone()
    }

    /// Whether a LinkedIn token is currently available.
    pub async fn has_linkedin_token(&self) -> bool {
        self.linkedin_token.read().await.is_some()
    }

    /// Store a LinkedIn token delivered by the OAuth callback.
    pub async fn set_linkedin_token(&self, token: String) {
        *self.linkedin_token.write().await = Some(token);
    }

    /// Drop the LinkedIn token after the publisher reports it rejected.
    pub async fn clear_linkedin_token(&self) {
        *self.linkedin_token.write().await = None;
    }
}
