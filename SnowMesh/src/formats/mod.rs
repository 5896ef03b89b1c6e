//! File format handlers for SnowRunner formats

pub mod meshes;

// Re-export main document types
pub use meshes::{DecodeOptions, ModelDocument, decode_model, read_model};
