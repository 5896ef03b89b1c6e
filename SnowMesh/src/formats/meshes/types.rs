//! Public data structures produced by the model decoder.

use glam::{Mat3, Mat4, Vec3};
use indexmap::IndexMap;
use serde::Serialize;

use super::vertex::{AttributeDescriptor, ChannelValue, Semantic};

/// Four stored vector4 rows.
///
/// Rows 0-2 carry the basis, row 3 carries the translation in xyz, so each
/// stored row is one column of a column-major matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Transform {
    pub rows: [[f32; 4]; 4],
}

impl Transform {
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.rows)
    }

    pub fn rotation(&self) -> Mat3 {
        Mat3::from_mat4(self.to_mat4())
    }

    pub fn translation(&self) -> Vec3 {
        let [x, y, z, _] = self.rows[3];
        Vec3::new(x, y, z)
    }
}

/// Two stored vector3 limits.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// File header preceding the node records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelHeader {
    /// Embedded xml blob (material definitions).
    pub xml: String,
    pub spacer: [i16; 3],
    pub node_count: i32,
    pub bounds: BoundingBox,
    pub mesh_count: i32,
}

/// One node (bone) record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub parent_id: i16,
    pub node_id: i16,
    pub link_in_count: i16,
    pub reserved: i16,
    pub name: String,
    pub transform: Transform,
}

/// A per-vertex set of decoded channels, keyed by semantic.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Vertex {
    pub channels: Vec<Channel>,
}

/// One decoded channel of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Channel {
    pub semantic: Semantic,
    pub value: ChannelValue,
}

impl Vertex {
    /// First channel carrying `semantic`.
    pub fn get(&self, semantic: Semantic) -> Option<&ChannelValue> {
        self.channels
            .iter()
            .find(|c| c.semantic == semantic)
            .map(|c| &c.value)
    }

    pub fn position(&self) -> Option<[f32; 3]> {
        match self.get(Semantic::Position)? {
            ChannelValue::Float3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn uv(&self) -> Option<[f32; 2]> {
        match self.get(Semantic::Uv)? {
            ChannelValue::Float2(v) => Some(*v),
            _ => None,
        }
    }

    /// Renormalized unit normal.
    pub fn normal(&self) -> Option<[f32; 3]> {
        match self.get(Semantic::Normal)? {
            ChannelValue::Normal { unit, .. } => Some(*unit),
            _ => None,
        }
    }

    /// Raw weight bytes.
    pub fn weights(&self) -> Option<[i8; 4]> {
        match self.get(Semantic::Weight)? {
            ChannelValue::SignedBytes(v) => Some(*v),
            _ => None,
        }
    }

    /// Link indices into the mesh's linked node list.
    pub fn links(&self) -> Option<[u8; 4]> {
        match self.get(Semantic::Link)? {
            ChannelValue::Bytes(v) => Some(*v),
            _ => None,
        }
    }
}

/// Three raw vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Triangle {
    pub a: u16,
    pub b: u16,
    pub c: u16,
}

impl Triangle {
    pub fn indices(&self) -> [u16; 3] {
        [self.a, self.b, self.c]
    }
}

/// Inclusive triangle and vertex span drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmeshRange {
    pub material_index: i32,
    pub triangle_start: i32,
    pub triangle_end: i32,
    pub vertex_start: i32,
    pub vertex_end: i32,
}

impl SubmeshRange {
    pub fn triangle_count(&self) -> i32 {
        self.triangle_end - self.triangle_start + 1
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertex_end - self.vertex_start + 1
    }
}

/// Offset/count quad stored by the linked layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SubRange {
    pub triangle_offset: i32,
    pub triangle_count: i32,
    pub vertex_offset: i32,
    pub vertex_count: i32,
}

/// Layout used when the mesh has no outbound links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleLayout {
    pub bounds: BoundingBox,
    /// Present only when the owning node has inbound links.
    pub extra_index: Option<i16>,
}

/// Layout used when the mesh links out to other nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedLayout {
    pub unknown: i16,
    /// Index array of each submesh, parallel to `MeshRecord::submeshes`.
    pub submesh_indices: Vec<Vec<i32>>,
    pub linked_node_ids: Vec<i16>,
    pub bounds: BoundingBox,
    pub block_indices: [i32; 2],
    pub sub_range: SubRange,
    pub extra_index: i16,
}

/// The two mesh record shapes, selected by the outbound link count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum MeshLayout {
    Simple(SimpleLayout),
    Linked(LinkedLayout),
}

impl MeshLayout {
    pub fn bounds(&self) -> &BoundingBox {
        match self {
            MeshLayout::Simple(s) => &s.bounds,
            MeshLayout::Linked(l) => &l.bounds,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MeshLayout::Simple(_) => "simple",
            MeshLayout::Linked(_) => "linked",
        }
    }
}

/// Classification of the 16-bit flag that follows the triangle list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EndFlag {
    /// `flag > 100`: four transform rows follow.
    LargeFlag,
    /// `4 <= flag <= 17`: a counted skip and a second flag follow.
    SmallFlagWithSkip,
    /// Anything else: the record ends here.
    NoTrailer,
}

impl EndFlag {
    pub const LARGE_MIN: i16 = 101;
    pub const SKIP_MIN: i16 = 4;
    pub const SKIP_MAX: i16 = 17;

    pub fn classify(flag: i16) -> Self {
        if flag >= Self::LARGE_MIN {
            EndFlag::LargeFlag
        } else if (Self::SKIP_MIN..=Self::SKIP_MAX).contains(&flag) {
            EndFlag::SmallFlagWithSkip
        } else {
            EndFlag::NoTrailer
        }
    }
}

/// What followed the end flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Trailer {
    None {
        flag: i16,
    },
    Transform {
        flag: i16,
        transform: Transform,
    },
    Skipped {
        flag: i16,
        /// Declared count; `count + 16` bytes were skipped.
        count: i16,
        next_flag: i16,
        transform: Option<Transform>,
    },
}

impl Trailer {
    pub fn flag(&self) -> i16 {
        match self {
            Trailer::None { flag } | Trailer::Transform { flag, .. } | Trailer::Skipped { flag, .. } => *flag,
        }
    }

    pub fn end_flag(&self) -> EndFlag {
        EndFlag::classify(self.flag())
    }
}

/// One mesh record, attached to the node preceding it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshRecord {
    pub name: String,
    pub vertex_count: i32,
    pub triangle_count: i32,
    pub unknown1: i32,
    pub unknown2: i32,
    pub materials: Vec<String>,
    pub link_out_transforms: Vec<Transform>,
    pub index_of_type: i16,
    pub layout: MeshLayout,
    pub submeshes: Vec<SubmeshRange>,
    pub attributes: Vec<AttributeDescriptor>,
    pub attribute_flags: [i32; 2],
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    pub trailer: Trailer,
}

impl MeshRecord {
    pub fn link_out_count(&self) -> usize {
        self.link_out_transforms.len()
    }
}

/// A node slot of the document together with its optional mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelNode {
    pub node: NodeRecord,
    pub mesh: Option<MeshRecord>,
}

/// Parent/child relation between node ids.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BoneHierarchy {
    pub roots: Vec<i16>,
    pub children: IndexMap<i16, Vec<i16>>,
}

impl BoneHierarchy {
    /// Build from nodes in stream order.
    ///
    /// A parent id of -1, or one not seen earlier in the stream, makes the node a root.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a NodeRecord>) -> Self {
        let mut hierarchy = Self::default();
        let mut seen = std::collections::HashSet::new();

        for node in nodes {
            if node.parent_id == -1 || !seen.contains(&node.parent_id) {
                hierarchy.roots.push(node.node_id);
            } else {
                hierarchy
                    .children
                    .entry(node.parent_id)
                    .or_default()
                    .push(node.node_id);
            }
            seen.insert(node.node_id);
        }

        hierarchy
    }

    pub fn children_of(&self, node_id: i16) -> &[i16] {
        self.children.get(&node_id).map_or(&[], Vec::as_slice)
    }
}

/// The decoded model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDocument {
    pub header: ModelHeader,
    pub nodes: Vec<ModelNode>,
    /// Material names of every mesh, de-duplicated in first-seen order.
    pub materials: Vec<String>,
    pub hierarchy: BoneHierarchy,
}

impl ModelDocument {
    pub fn meshes(&self) -> impl Iterator<Item = (&NodeRecord, &MeshRecord)> {
        self.nodes
            .iter()
            .filter_map(|n| n.mesh.as_ref().map(|m| (&n.node, m)))
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes().count()
    }

    pub fn node(&self, node_id: i16) -> Option<&NodeRecord> {
        self.nodes
            .iter()
            .map(|n| &n.node)
            .find(|n| n.node_id == node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(parent_id: i16, node_id: i16) -> NodeRecord {
        NodeRecord {
            parent_id,
            node_id,
            link_in_count: 0,
            reserved: 0,
            name: format!("bone{node_id}"),
            transform: Transform::default(),
        }
    }

    #[test]
    fn test_end_flag_boundaries() {
        assert_eq!(EndFlag::classify(3), EndFlag::NoTrailer);
        assert_eq!(EndFlag::classify(4), EndFlag::SmallFlagWithSkip);
        assert_eq!(EndFlag::classify(17), EndFlag::SmallFlagWithSkip);
        assert_eq!(EndFlag::classify(18), EndFlag::NoTrailer);
        assert_eq!(EndFlag::classify(100), EndFlag::NoTrailer);
        assert_eq!(EndFlag::classify(101), EndFlag::LargeFlag);
        assert_eq!(EndFlag::classify(-5), EndFlag::NoTrailer);
        assert_eq!(EndFlag::classify(i16::MAX), EndFlag::LargeFlag);
    }

    #[test]
    fn test_hierarchy_roots_and_children() {
        let nodes = [node(-1, 0), node(0, 1), node(1, 2), node(0, 3), node(7, 4)];
        let hierarchy = BoneHierarchy::from_nodes(&nodes);

        // 4's parent never appeared before it
        assert_eq!(hierarchy.roots, vec![0, 4]);
        assert_eq!(hierarchy.children_of(0), &[1, 3]);
        assert_eq!(hierarchy.children_of(1), &[2]);
        assert!(hierarchy.children_of(2).is_empty());
    }

    #[test]
    fn test_transform_translation() {
        let transform = Transform {
            rows: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [2.0, 3.0, 4.0, 1.0],
            ],
        };
        assert_eq!(transform.translation(), Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(transform.to_mat4().w_axis.truncate(), Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(transform.rotation(), Mat3::IDENTITY);
    }

    #[test]
    fn test_submesh_counts() {
        let range = SubmeshRange {
            material_index: 0,
            triangle_start: 10,
            triangle_end: 19,
            vertex_start: 0,
            vertex_end: 29,
        };
        assert_eq!(range.triangle_count(), 10);
        assert_eq!(range.vertex_count(), 30);
    }
}
