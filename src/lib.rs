#![forbid(unsafe_code)]

//! `postpilot` — headless content-scheduling agent for the social-content
//! backend: curate scraped ideas, generate post copy via a remote chat
//! completion endpoint, and publish scheduled posts to LinkedIn.

pub mod backend;
pub mod config;
pub mod errors;
pub mod ideas;
pub mod linkedin;
pub mod media;
pub mod models;
pub mod scheduler;
pub mod session;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
