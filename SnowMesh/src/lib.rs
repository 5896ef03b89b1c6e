//! # SnowMesh
//!
//! A pure-Rust decoder for SnowRunner `[meshes]` model containers.
//!
//! ## Supported Data
//!
//! - **Nodes** - Bone hierarchy with names and 4x4 transforms
//! - **Meshes** - Vertices decoded through per-mesh attribute tables, triangles and submesh ranges
//! - **Linkage** - Link-out transforms and linked node ids for skinned meshes
//! - **Materials** - Material names per mesh and the header's xml material definitions
//!
//! ## Quick Start
//!
//! ```no_run
//! use snowmesh::formats::meshes::read_model;
//!
//! let model = read_model("truck_cabin.model")?;
//! for (node, mesh) in model.meshes() {
//!     println!("{} -> {} ({} vertices)", node.name, mesh.name, mesh.vertices.len());
//! }
//! # Ok::<(), snowmesh::Error>(())
//! ```
//!
//! ### Keeping partial results
//!
//! ```no_run
//! use snowmesh::formats::meshes::{AttributePolicy, DecodeOptions, read_model_with};
//!
//! let options = DecodeOptions::new().with_attribute_policy(AttributePolicy::Lenient);
//! let outcome = read_model_with("broken.model", &options)?;
//! if let Some(failure) = &outcome.failure {
//!     eprintln!("stopped at node {}: {}", failure.node_index, failure.error);
//! }
//! println!("{} nodes decoded", outcome.document.nodes.len());
//! # Ok::<(), snowmesh::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `snowmesh` command-line binary

pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::formats::meshes::{
        AttributePolicy, DecodeOptions, DecodeOutcome, MaterialDefinition, MeshChannels,
        MeshRecord, ModelDocument, NodeRecord, SubmeshRange, Transform, decode_model,
        inspect_model, parse_model_bytes, read_model, read_model_with,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
