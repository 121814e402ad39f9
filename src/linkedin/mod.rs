//! LinkedIn publishing surface, reached through the backend's
//! `/linkedin/*` endpoints (the OAuth dance itself stays on the backend).

pub mod client;

pub use client::LinkedInClient;
