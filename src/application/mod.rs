//! Application services layer.

pub mod error;
pub mod export;
pub mod properties;
pub mod render;
pub mod repos;
pub mod template;
pub mod view;
