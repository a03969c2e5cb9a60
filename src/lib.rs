//! Markdown export pipeline: stored documents are converted to sanitised HTML,
//! outlined into a heading tree, and rendered through Handlebars templates in
//! isolated, single-use units.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
