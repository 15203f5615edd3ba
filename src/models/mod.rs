// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod post;

pub use document::Document;
pub use post::GeneratedPost;
