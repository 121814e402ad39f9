//! Scheduled-post publication workflow.
//!
//! Four cooperating parts: [`cache::ScheduleCache`] syncs the remote list,
//! [`scanner::Scanner`] runs the fixed-period due scan, the
//! [`publisher::LinkedInPublisher`] delivers due posts, and
//! [`reconciler::Reconciler`] transitions status and refreshes the cache.

pub mod cache;
pub mod publisher;
pub mod reconciler;
pub mod scanner;
