//! Domain model module declarations.

pub mod idea;
pub mod post;
