//! Flattened views of a decoded model for scene construction.
//!
//! Geometry builders want parallel per-vertex arrays, valid faces only and
//! skin weights resolved to node ids. These helpers derive all of that from
//! the raw records without changing them.

use serde::Serialize;

use super::types::{BoneHierarchy, MeshLayout, MeshRecord, ModelDocument, SubmeshRange, Triangle};

/// Per-vertex channel arrays of one mesh, all `vertex_count` long.
///
/// Vertices without a channel get zeroes.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MeshChannels {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub weights: Vec<[i8; 4]>,
    pub links: Vec<[u8; 4]>,
}

/// One bone influence on a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkinWeight {
    pub node_id: i16,
    /// Weight byte scaled to `0.0..=1.0`.
    pub weight: f32,
}

impl MeshRecord {
    pub fn channels(&self) -> MeshChannels {
        let n = self.vertices.len();
        let mut channels = MeshChannels {
            positions: Vec::with_capacity(n),
            uvs: Vec::with_capacity(n),
            normals: Vec::with_capacity(n),
            weights: Vec::with_capacity(n),
            links: Vec::with_capacity(n),
        };

        for vertex in &self.vertices {
            channels.positions.push(vertex.position().unwrap_or_default());
            channels.uvs.push(vertex.uv().unwrap_or_default());
            channels.normals.push(vertex.normal().unwrap_or_default());
            channels.weights.push(vertex.weights().unwrap_or_default());
            channels.links.push(vertex.links().unwrap_or_default());
        }

        channels
    }

    /// Triangles whose indices all address an existing vertex.
    pub fn valid_faces(&self) -> Vec<Triangle> {
        let limit = self.vertices.len();
        self.triangles
            .iter()
            .filter(|t| {
                let valid = t.indices().iter().all(|&i| usize::from(i) < limit);
                if !valid {
                    tracing::debug!(
                        "Skipping face {:?} of mesh '{}' ({} vertices)",
                        t.indices(),
                        self.name,
                        limit
                    );
                }
                valid
            })
            .copied()
            .collect()
    }

    /// Material name of a submesh, `None` when its index is out of range.
    pub fn material_for(&self, submesh: &SubmeshRange) -> Option<&str> {
        usize::try_from(submesh.material_index)
            .ok()
            .and_then(|i| self.materials.get(i))
            .map(String::as_str)
    }

    /// Node ids that vertex link bytes index into. Empty for the simple layout.
    pub fn linked_node_ids(&self) -> &[i16] {
        match &self.layout {
            MeshLayout::Linked(linked) => &linked.linked_node_ids,
            MeshLayout::Simple(_) => &[],
        }
    }

    /// Bone influences of every vertex.
    ///
    /// A weight byte is an unsigned magnitude; zero weights and links past
    /// the linked node list are dropped.
    pub fn skin_weights(&self) -> Vec<Vec<SkinWeight>> {
        let linked = self.linked_node_ids();

        self.vertices
            .iter()
            .map(|vertex| {
                let (Some(weights), Some(links)) = (vertex.weights(), vertex.links()) else {
                    return Vec::new();
                };
                weights
                    .iter()
                    .zip(links)
                    .filter(|(w, _)| **w != 0)
                    .filter_map(|(&w, link)| {
                        linked.get(usize::from(link)).map(|&node_id| SkinWeight {
                            node_id,
                            weight: f32::from(w as u8) / 255.0,
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

impl ModelDocument {
    pub fn hierarchy(&self) -> &BoneHierarchy {
        &self.hierarchy
    }

    /// De-duplicated material names of all meshes, in first-seen order.
    pub fn materials(&self) -> &[String] {
        &self.materials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::meshes::types::{
        BoundingBox, Channel, LinkedLayout, SimpleLayout, SubRange, Trailer, Vertex,
    };
    use crate::formats::meshes::vertex::{ChannelValue, Semantic};
    use pretty_assertions::assert_eq;

    fn skinned_vertex(position: [f32; 3], weights: [i8; 4], links: [u8; 4]) -> Vertex {
        Vertex {
            channels: vec![
                Channel { semantic: Semantic::Position, value: ChannelValue::Float3(position) },
                Channel { semantic: Semantic::Weight, value: ChannelValue::SignedBytes(weights) },
                Channel { semantic: Semantic::Link, value: ChannelValue::Bytes(links) },
            ],
        }
    }

    fn mesh(layout: MeshLayout, vertices: Vec<Vertex>, triangles: Vec<Triangle>) -> MeshRecord {
        MeshRecord {
            name: "mesh".to_string(),
            vertex_count: vertices.len() as i32,
            triangle_count: triangles.len() as i32,
            unknown1: 0,
            unknown2: 0,
            materials: vec!["paint".to_string(), String::new()],
            link_out_transforms: Vec::new(),
            index_of_type: 0,
            layout,
            submeshes: Vec::new(),
            attributes: Vec::new(),
            attribute_flags: [0, 0],
            vertices,
            triangles,
            trailer: Trailer::None { flag: 0 },
        }
    }

    fn linked(ids: Vec<i16>) -> MeshLayout {
        MeshLayout::Linked(LinkedLayout {
            unknown: 0,
            submesh_indices: Vec::new(),
            linked_node_ids: ids,
            bounds: BoundingBox::default(),
            block_indices: [0, 0],
            sub_range: SubRange::default(),
            extra_index: 0,
        })
    }

    fn simple() -> MeshLayout {
        MeshLayout::Simple(SimpleLayout { bounds: BoundingBox::default(), extra_index: None })
    }

    #[test]
    fn test_channels_fill_missing_with_defaults() {
        let vertices = vec![
            skinned_vertex([1.0, 2.0, 3.0], [0; 4], [0; 4]),
            Vertex {
                channels: vec![Channel {
                    semantic: Semantic::Uv,
                    value: ChannelValue::Float2([0.5, 0.25]),
                }],
            },
        ];
        let channels = mesh(simple(), vertices, Vec::new()).channels();

        assert_eq!(channels.positions, vec![[1.0, 2.0, 3.0], [0.0; 3]]);
        assert_eq!(channels.uvs, vec![[0.0; 2], [0.5, 0.25]]);
        assert_eq!(channels.normals.len(), 2);
        assert_eq!(channels.links, vec![[0; 4]; 2]);
    }

    #[test]
    fn test_valid_faces_skip_out_of_range() {
        let vertices = vec![Vertex::default(); 3];
        let triangles = vec![
            Triangle { a: 0, b: 1, c: 2 },
            Triangle { a: 0, b: 1, c: 3 },
            Triangle { a: 2, b: 2, c: 2 },
        ];
        let faces = mesh(simple(), vertices, triangles).valid_faces();
        assert_eq!(faces, vec![Triangle { a: 0, b: 1, c: 2 }, Triangle { a: 2, b: 2, c: 2 }]);
    }

    #[test]
    fn test_material_for_submesh() {
        let record = mesh(simple(), Vec::new(), Vec::new());
        let range = |material_index| SubmeshRange {
            material_index,
            triangle_start: 0,
            triangle_end: 0,
            vertex_start: 0,
            vertex_end: 0,
        };
        assert_eq!(record.material_for(&range(0)), Some("paint"));
        assert_eq!(record.material_for(&range(1)), Some(""));
        assert_eq!(record.material_for(&range(2)), None);
        assert_eq!(record.material_for(&range(-1)), None);
    }

    #[test]
    fn test_skin_weights_resolve_links() {
        // 0xFF is stored as -1 and means full weight
        let vertices = vec![
            skinned_vertex([0.0; 3], [-1, 0, 0, 0], [1, 0, 0, 0]),
            skinned_vertex([0.0; 3], [127, -128, 0, 10], [0, 1, 2, 7]),
        ];
        let record = mesh(linked(vec![12, 40]), vertices, Vec::new());
        assert_eq!(record.linked_node_ids(), &[12, 40]);

        let weights = record.skin_weights();
        assert_eq!(weights[0], vec![SkinWeight { node_id: 40, weight: 1.0 }]);
        assert_eq!(
            weights[1],
            vec![
                SkinWeight { node_id: 12, weight: 127.0 / 255.0 },
                SkinWeight { node_id: 40, weight: 128.0 / 255.0 },
            ]
        );
    }

    #[test]
    fn test_simple_layout_has_no_links() {
        let vertices = vec![skinned_vertex([0.0; 3], [-1, 0, 0, 0], [0; 4])];
        let record = mesh(simple(), vertices, Vec::new());
        assert!(record.linked_node_ids().is_empty());
        assert_eq!(record.skin_weights(), vec![Vec::new()]);
    }
}
