//! Domain layer types and invariants.

pub mod document;
pub mod error;
pub mod headings;
pub mod slug;
