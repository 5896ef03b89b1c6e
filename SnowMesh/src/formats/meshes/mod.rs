//! SnowRunner `[meshes]` model containers
//!
//! A model file is a header (material xml, node and mesh counts) followed by
//! node records, each optionally followed by the mesh record attached to it.
//! Decoding is a single forward pass; see [`decode_model`].

pub mod cursor;
pub mod document;
pub mod inspect;
pub mod materials;
pub mod options;
pub mod scene;
pub mod trace;
pub mod types;
pub mod vertex;

mod mesh;
mod node;
mod reader;

#[cfg(test)]
pub(crate) mod test_support;

// Public API exports
pub use cursor::{ModelCursor, Primitive};
pub use document::{
    DecodeOutcome, RecordFailure, decode_model, parse_model_bytes, read_model, read_model_with,
};
pub use inspect::{MeshInfo, ModelInfo, inspect_model, model_info, render_transcript};
pub use materials::{
    MaterialDefinition, find_texture, is_non_color_map, parse_material_definitions,
    texture_file_name,
};
pub use options::{AttributePolicy, DecodeOptions};
pub use scene::{MeshChannels, SkinWeight};
pub use trace::{Trace, TraceEntry, TraceValue};
pub use types::{
    BoneHierarchy, BoundingBox, Channel, EndFlag, LinkedLayout, MeshLayout, MeshRecord,
    ModelDocument, ModelHeader, ModelNode, NodeRecord, SimpleLayout, SubRange, SubmeshRange,
    Trailer, Transform, Triangle, Vertex,
};
pub use vertex::{
    AttributeDescriptor, CODECS, ChannelCodec, ChannelValue, DataType, Semantic, VertexLayout,
    unpack_normal,
};
