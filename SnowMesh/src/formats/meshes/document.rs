//! Whole-file decoding.
//!
//! ```text
//! int32 xml_length | bytes[xml_length - 2] xml
//! int16 x 3 spacer | int32 node_count | vector3 x 2 bounds | int32 mesh_count
//! node_count x (node record, then either a mesh record or a zero int32 marker)
//! ```
//!
//! A node is followed by a mesh when the next int32 (the mesh's vertex count)
//! is non-zero. The word is peeked, so the mesh decoder starts on it.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::path::Path;

use indexmap::IndexSet;

use super::mesh::read_mesh;
use super::node::read_node;
use super::options::DecodeOptions;
use super::reader::RecordReader;
use super::trace::{Trace, TraceValue};
use super::types::{BoneHierarchy, MeshRecord, ModelDocument, ModelHeader, ModelNode, NodeRecord};
use crate::error::{Error, Result};

/// Size of the int32 word that separates a mesh-less node from the next node.
const MARKER_SIZE: usize = 4;

/// A record-level failure that stopped the decode.
#[derive(Debug)]
pub struct RecordFailure {
    /// Index of the node slot being decoded.
    pub node_index: usize,
    /// Offset where the failing record started.
    pub offset: usize,
    pub error: Error,
}

/// Result of a decode that got past the header.
///
/// `document` holds everything decoded before `failure`, if any.
#[derive(Debug)]
pub struct DecodeOutcome {
    pub document: ModelDocument,
    pub failure: Option<RecordFailure>,
    /// Empty unless [`DecodeOptions::trace`] was set.
    pub trace: Trace,
}

impl DecodeOutcome {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// The document, or the record error if the decode stopped early.
    pub fn into_result(self) -> Result<ModelDocument> {
        match self.failure {
            Some(failure) => Err(failure.error),
            None => Ok(self.document),
        }
    }
}

/// Accumulates nodes and meshes while the file is walked.
struct DocumentBuilder {
    header: ModelHeader,
    nodes: Vec<ModelNode>,
    materials: IndexSet<String>,
    mesh_count: usize,
}

impl DocumentBuilder {
    fn new(header: ModelHeader) -> Self {
        Self {
            nodes: Vec::with_capacity(header.node_count as usize),
            header,
            materials: IndexSet::new(),
            mesh_count: 0,
        }
    }

    fn push(&mut self, node: NodeRecord, mesh: Option<MeshRecord>) {
        if let Some(mesh) = &mesh {
            self.materials.extend(mesh.materials.iter().cloned());
            self.mesh_count += 1;
        }
        self.nodes.push(ModelNode { node, mesh });
    }

    fn finish(self) -> ModelDocument {
        let hierarchy = BoneHierarchy::from_nodes(self.nodes.iter().map(|n| &n.node));
        ModelDocument {
            header: self.header,
            nodes: self.nodes,
            materials: self.materials.into_iter().collect(),
            hierarchy,
        }
    }
}

fn read_header(reader: &mut RecordReader<'_, '_>) -> Result<ModelHeader> {
    let buffer_len = reader.cursor.len();
    let xml_length = reader.i32("xml_length")?;
    if xml_length < 2 || xml_length as usize >= buffer_len {
        return Err(Error::InvalidXmlLength {
            length: xml_length,
            buffer_len,
        });
    }

    let offset = reader.position();
    let raw = reader.cursor.read_bytes(xml_length as usize - 2)?;
    let xml = String::from_utf8_lossy(raw).trim_end_matches('\0').to_string();
    reader.trace.record(offset, "xml", xml.as_str());

    let spacer = reader.i16s("spacer")?;

    let node_count = reader.i32("node_count")?;
    let max_nodes = reader.options.max_node_count;
    if !(0..=max_nodes).contains(&node_count) {
        return Err(Error::InvalidNodeCount {
            count: node_count,
            max: max_nodes,
        });
    }

    let bounds = reader.bounds()?;

    let mesh_count = reader.i32("mesh_count")?;
    let max_meshes = reader.options.max_mesh_count;
    if !(0..=max_meshes).contains(&mesh_count) {
        return Err(Error::InvalidMeshCount {
            count: mesh_count,
            max: max_meshes,
        });
    }

    Ok(ModelHeader {
        xml,
        spacer,
        node_count,
        bounds,
        mesh_count,
    })
}

/// After a node: skip the zero marker, or decode the mesh the non-zero word starts.
fn read_attachment(
    reader: &mut RecordReader<'_, '_>,
    builder: &DocumentBuilder,
    link_in_count: i16,
) -> Result<Option<MeshRecord>> {
    let next = reader.cursor.peek(MARKER_SIZE)?;

    if next.iter().all(|&b| b == 0) {
        let offset = reader.position();
        reader.cursor.skip(MARKER_SIZE)?;
        reader.trace.record(offset, "mesh_marker", TraceValue::Skipped(MARKER_SIZE));
        return Ok(None);
    }

    let declared = builder.header.mesh_count;
    if builder.mesh_count >= declared as usize {
        return Err(Error::MeshCountExceeded {
            declared,
            offset: reader.position(),
        });
    }

    read_mesh(reader, link_in_count).map(Some)
}

fn record_failure(node_index: usize, node_count: usize, offset: usize, error: Error) -> RecordFailure {
    tracing::warn!(
        "Decode stopped at node {}/{} (offset {}): {}",
        node_index + 1,
        node_count,
        offset,
        error
    );
    RecordFailure {
        node_index,
        offset,
        error,
    }
}

/// Decode a model from memory.
///
/// Header problems fail the whole call. A failing node or mesh record stops
/// the walk; everything decoded before it is returned in the outcome together
/// with the failure.
///
/// # Errors
/// Returns an error if the file header is truncated or out of range.
pub fn decode_model(data: &[u8], options: &DecodeOptions) -> Result<DecodeOutcome> {
    let mut reader = RecordReader::new(data, options);

    let header = read_header(&mut reader)?;
    tracing::debug!(
        "Model header: {} nodes, {} meshes, {} bytes of xml",
        header.node_count,
        header.mesh_count,
        header.xml.len()
    );

    let node_count = header.node_count as usize;
    let mut builder = DocumentBuilder::new(header);
    let mut failure = None;

    for node_index in 0..node_count {
        let offset = reader.position();

        let node = match read_node(&mut reader) {
            Ok(node) => node,
            Err(error) => {
                failure = Some(record_failure(node_index, node_count, offset, error));
                break;
            }
        };

        match read_attachment(&mut reader, &builder, node.link_in_count) {
            Ok(mesh) => builder.push(node, mesh),
            Err(error) => {
                builder.push(node, None);
                failure = Some(record_failure(node_index, node_count, offset, error));
                break;
            }
        }
    }

    if failure.is_none() {
        if builder.mesh_count != builder.header.mesh_count as usize {
            tracing::warn!(
                "Header declares {} meshes, found {}",
                builder.header.mesh_count,
                builder.mesh_count
            );
        }
        if !reader.cursor.is_empty() {
            tracing::debug!("{} trailing bytes after last node", reader.cursor.remaining());
        }
    }

    Ok(DecodeOutcome {
        document: builder.finish(),
        failure,
        trace: reader.trace,
    })
}

/// Decode a model from memory with default options, failing on any record error.
///
/// # Errors
/// Returns an error if the header or any record fails to decode.
pub fn parse_model_bytes(data: &[u8]) -> Result<ModelDocument> {
    decode_model(data, &DecodeOptions::default())?.into_result()
}

/// Read and decode a model file with default options.
///
/// # Errors
/// Returns an error if the file cannot be read or fails to decode.
pub fn read_model<P: AsRef<Path>>(path: P) -> Result<ModelDocument> {
    read_model_with(path, &DecodeOptions::default())?.into_result()
}

/// Read and decode a model file, keeping partial results.
///
/// # Errors
/// Returns an error if the file cannot be read or its header is invalid.
pub fn read_model_with<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<DecodeOutcome> {
    let path = path.as_ref();
    tracing::info!("Reading model {}", path.display());
    let data = std::fs::read(path)?;
    decode_model(&data, options)
}
