//! Model inspection utilities
//!
//! Summaries of a decoded model and a readable rendering of the decode trace.

use std::fmt::Write as _;
use std::path::Path;

use super::document::{DecodeOutcome, read_model_with};
use super::options::DecodeOptions;
use super::trace::{Trace, TraceValue};
use crate::error::Result;

/// Summary of a model file.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelInfo {
    pub file_path: String,
    pub node_count: i32,
    pub declared_mesh_count: i32,
    pub decoded_node_count: usize,
    pub meshes: Vec<MeshInfo>,
    pub materials: Vec<String>,
    /// Set when the decode stopped early.
    pub failure: Option<String>,
}

/// Summary of one mesh.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MeshInfo {
    pub node_name: String,
    pub name: String,
    pub layout: &'static str,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub submesh_count: usize,
    pub material_count: usize,
    pub linked_node_count: usize,
    pub trailer_flag: i16,
}

/// Summarize a decode outcome.
pub fn model_info(file_path: &str, outcome: &DecodeOutcome) -> ModelInfo {
    let doc = &outcome.document;

    let meshes = doc
        .meshes()
        .map(|(node, mesh)| MeshInfo {
            node_name: node.name.clone(),
            name: mesh.name.clone(),
            layout: mesh.layout.name(),
            vertex_count: mesh.vertices.len(),
            triangle_count: mesh.triangles.len(),
            submesh_count: mesh.submeshes.len(),
            material_count: mesh.materials.len(),
            linked_node_count: mesh.linked_node_ids().len(),
            trailer_flag: mesh.trailer.flag(),
        })
        .collect();

    ModelInfo {
        file_path: file_path.to_string(),
        node_count: doc.header.node_count,
        declared_mesh_count: doc.header.mesh_count,
        decoded_node_count: doc.nodes.len(),
        meshes,
        materials: doc.materials.clone(),
        failure: outcome.failure.as_ref().map(|f| {
            format!("node {} at offset {}: {}", f.node_index, f.offset, f.error)
        }),
    }
}

/// Decode a model file and summarize it.
///
/// # Errors
/// Returns an error if the file cannot be read or its header is invalid.
pub fn inspect_model<P: AsRef<Path>>(source: P, options: &DecodeOptions) -> Result<ModelInfo> {
    let source_path = source.as_ref();
    let outcome = read_model_with(source_path, options)?;
    Ok(model_info(&source_path.display().to_string(), &outcome))
}

fn format_value(value: &TraceValue) -> String {
    match value {
        TraceValue::Int(v) => v.to_string(),
        TraceValue::Ints(v) => format!("{v:?}"),
        TraceValue::Floats(v) => format!("{v:?}"),
        TraceValue::Text(v) => format!("{v:?}"),
        TraceValue::Rows(rows) => rows
            .iter()
            .map(|r| format!("{r:?}"))
            .collect::<Vec<_>>()
            .join(" "),
        TraceValue::Channel(v) => format!("{v:?}"),
        TraceValue::Skipped(n) => format!("<{n} bytes skipped>"),
    }
}

/// Render a trace as `@offset field = value` lines.
pub fn render_transcript(trace: &Trace) -> String {
    let mut out = String::new();
    for entry in trace.entries() {
        let _ = writeln!(out, "@{} {} = {}", entry.offset, entry.field, format_value(&entry.value));
    }
    out
}
