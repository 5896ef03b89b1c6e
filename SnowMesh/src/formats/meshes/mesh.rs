//! Mesh records.
//!
//! A mesh record follows the node it is attached to. Its shape depends on the
//! outbound link count:
//!
//! ```text
//! int32 vertex_count | int32 triangle_count | name
//! int32 unknown1 | int32 material_count | int32 unknown2 | name x material_count
//! int32 link_out_count | (vector4 x 4) x link_out_count
//! int16 index_of_type
//!
//! simple (link_out_count == 0):
//!   vector3 x 2 bounds | int32 submesh_count | submesh x submesh_count
//!   attribute table | vertices | triangles | [int16 extra index if link_in_count != 0]
//!
//! linked (link_out_count != 0):
//!   int16 unknown | int32 submesh_count | int32 index_length x submesh_count
//!   (submesh + int32 x index_length) x submesh_count
//!   int16 linked_node_id x link_out_count | vector3 x 2 bounds | int32 x 2 block indices
//!   int32 x 4 sub range | attribute table | vertices | triangles | int16 extra index
//!
//! int16 end flag | trailer
//! ```
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use super::reader::RecordReader;
use super::trace::TraceValue;
use super::types::{
    EndFlag, LinkedLayout, MeshLayout, MeshRecord, SimpleLayout, SubRange, SubmeshRange, Trailer,
    Triangle, Vertex,
};
use super::vertex::{AttributeDescriptor, VertexLayout};
use crate::error::{Error, Result};

/// Submesh entry: material index, triangle offset/count, vertex offset/count.
const SUBMESH_SIZE: usize = 20;
const DESCRIPTOR_SIZE: usize = 8;
const TRIANGLE_SIZE: usize = 6;

/// Declared element counts of the mesh being decoded.
#[derive(Debug, Clone, Copy)]
struct MeshCounts {
    vertices: usize,
    triangles: usize,
}

/// Attribute table plus vertex and triangle payload, shared by both layouts.
struct Geometry {
    attributes: Vec<AttributeDescriptor>,
    attribute_flags: [i32; 2],
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
}

struct LayoutPayload {
    layout: MeshLayout,
    submeshes: Vec<SubmeshRange>,
    geometry: Geometry,
}

/// Decode one mesh record at the current offset.
///
/// `link_in_count` comes from the node the mesh is attached to.
pub(crate) fn read_mesh(reader: &mut RecordReader<'_, '_>, link_in_count: i16) -> Result<MeshRecord> {
    let start = reader.position();

    let vertex_count = reader.count("vertex_count")?;
    let triangle_count = reader.count("triangle_count")?;
    let counts = MeshCounts {
        vertices: vertex_count,
        triangles: triangle_count,
    };
    let name = reader.name("mesh_name")?;

    let unknown1 = reader.i32("unknown1")?;
    let material_count = reader.count("material_count")?;
    let unknown2 = reader.i32("unknown2")?;

    reader.cursor.ensure(material_count, 4)?;
    let materials = (0..material_count)
        .map(|_| reader.name("material"))
        .collect::<Result<Vec<_>>>()?;

    let link_out_count = reader.count("link_out_count")?;
    let link_out_transforms = reader.transforms(link_out_count, "link_out_transform")?;

    let index_of_type = reader.i16("index_of_type")?;

    tracing::debug!(
        "Mesh '{}' at offset {}: {} vertices, {} triangles, {} materials, {} links out",
        name,
        start,
        vertex_count,
        triangle_count,
        material_count,
        link_out_count
    );

    let payload = if link_out_count == 0 {
        read_simple_layout(reader, counts, link_in_count)?
    } else {
        read_linked_layout(reader, counts, link_out_count)?
    };

    for submesh in &payload.submeshes {
        if !usize::try_from(submesh.material_index).is_ok_and(|i| i < materials.len()) {
            tracing::warn!(
                "Mesh '{}' submesh uses material index {} of {}; drawn without material",
                name,
                submesh.material_index,
                materials.len()
            );
        }
    }

    let trailer = read_trailer(reader)?;

    Ok(MeshRecord {
        name,
        vertex_count: vertex_count as i32,
        triangle_count: triangle_count as i32,
        unknown1,
        unknown2,
        materials,
        link_out_transforms,
        index_of_type,
        layout: payload.layout,
        submeshes: payload.submeshes,
        attributes: payload.geometry.attributes,
        attribute_flags: payload.geometry.attribute_flags,
        vertices: payload.geometry.vertices,
        triangles: payload.geometry.triangles,
        trailer,
    })
}

fn read_simple_layout(
    reader: &mut RecordReader<'_, '_>,
    counts: MeshCounts,
    link_in_count: i16,
) -> Result<LayoutPayload> {
    let bounds = reader.bounds()?;

    let submesh_count = reader.count("submesh_count")?;
    reader.cursor.ensure(submesh_count, SUBMESH_SIZE)?;
    let submeshes = (0..submesh_count)
        .map(|i| read_submesh(reader, i, counts))
        .collect::<Result<Vec<_>>>()?;

    let geometry = read_geometry(reader, counts)?;

    let extra_index = if link_in_count != 0 {
        Some(reader.i16("extra_index")?)
    } else {
        None
    };

    Ok(LayoutPayload {
        layout: MeshLayout::Simple(SimpleLayout {
            bounds,
            extra_index,
        }),
        submeshes,
        geometry,
    })
}

fn read_linked_layout(
    reader: &mut RecordReader<'_, '_>,
    counts: MeshCounts,
    link_out_count: usize,
) -> Result<LayoutPayload> {
    let unknown = reader.i16("unknown3")?;

    let submesh_count = reader.count("submesh_count")?;
    reader.cursor.ensure(submesh_count, 4)?;
    let index_lengths = (0..submesh_count)
        .map(|_| reader.count("submesh_index_length"))
        .collect::<Result<Vec<_>>>()?;

    let mut submeshes = Vec::with_capacity(submesh_count);
    let mut submesh_indices = Vec::with_capacity(submesh_count);
    for (i, &length) in index_lengths.iter().enumerate() {
        submeshes.push(read_submesh(reader, i, counts)?);

        let offset = reader.position();
        let indices = reader.cursor.read::<i32>(length)?;
        let traced = TraceValue::Ints(indices.iter().map(|&x| x.into()).collect());
        reader.trace.record(offset, "submesh_indices", traced);
        submesh_indices.push(indices);
    }

    let offset = reader.position();
    let linked_node_ids = reader.cursor.read::<i16>(link_out_count)?;
    let traced = TraceValue::Ints(linked_node_ids.iter().map(|&x| x.into()).collect());
    reader.trace.record(offset, "linked_node_ids", traced);

    let bounds = reader.bounds()?;
    let block_indices = reader.i32s("block_indices")?;
    let [triangle_offset, triangle_count, vertex_offset, vertex_count] = reader.i32s("sub_range")?;

    let geometry = read_geometry(reader, counts)?;
    let extra_index = reader.i16("extra_index")?;

    Ok(LayoutPayload {
        layout: MeshLayout::Linked(LinkedLayout {
            unknown,
            submesh_indices,
            linked_node_ids,
            bounds,
            block_indices,
            sub_range: SubRange {
                triangle_offset,
                triangle_count,
                vertex_offset,
                vertex_count,
            },
            extra_index,
        }),
        submeshes,
        geometry,
    })
}

/// Read a `(material, tri offset, tri count, vert offset, vert count)` entry
/// and convert it to inclusive ranges inside the mesh.
fn read_submesh(
    reader: &mut RecordReader<'_, '_>,
    index: usize,
    counts: MeshCounts,
) -> Result<SubmeshRange> {
    let [material_index, tri_offset, tri_count, vert_offset, vert_count] = reader.i32s("submesh")?;

    let (triangle_start, triangle_end) =
        inclusive_range(index, "triangle", tri_offset, tri_count, counts.triangles)?;
    let (vertex_start, vertex_end) =
        inclusive_range(index, "vertex", vert_offset, vert_count, counts.vertices)?;

    Ok(SubmeshRange {
        material_index,
        triangle_start,
        triangle_end,
        vertex_start,
        vertex_end,
    })
}

fn inclusive_range(
    index: usize,
    what: &'static str,
    offset: i32,
    count: i32,
    limit: usize,
) -> Result<(i32, i32)> {
    let start = i64::from(offset);
    let end = start + i64::from(count) - 1;
    if start < 0 || end < start || end >= limit as i64 {
        return Err(Error::InvalidSubmeshRange {
            index,
            what,
            start,
            end,
            limit: limit as i32,
        });
    }
    Ok((start as i32, end as i32))
}

fn read_geometry(reader: &mut RecordReader<'_, '_>, counts: MeshCounts) -> Result<Geometry> {
    let table_offset = reader.position();
    let descriptor_count = reader.count("attribute_count")?;
    reader.cursor.ensure(descriptor_count, DESCRIPTOR_SIZE)?;
    let attributes = (0..descriptor_count)
        .map(|_| reader.i16s("attribute").map(AttributeDescriptor::from_raw))
        .collect::<Result<Vec<_>>>()?;
    let attribute_flags = reader.i32s("attribute_flags")?;

    let layout = VertexLayout::resolve(&attributes, reader.options.attribute_policy, table_offset)?;
    if layout.stride() == 0 && counts.vertices > 0 {
        return Err(Error::EmptyVertexLayout {
            count: counts.vertices,
            offset: table_offset,
        });
    }

    reader.cursor.ensure(counts.vertices, layout.stride())?;
    let mut vertices = Vec::with_capacity(counts.vertices);
    for _ in 0..counts.vertices {
        vertices.push(layout.read_vertex(&mut reader.cursor, &mut reader.trace)?);
    }

    reader.cursor.ensure(counts.triangles, TRIANGLE_SIZE)?;
    let mut triangles = Vec::with_capacity(counts.triangles);
    for _ in 0..counts.triangles {
        let offset = reader.position();
        let [a, b, c] = reader.cursor.read_array::<u16, 3>()?;
        reader.trace.record(offset, "triangle", [a, b, c]);
        triangles.push(Triangle { a, b, c });
    }

    Ok(Geometry {
        attributes,
        attribute_flags,
        vertices,
        triangles,
    })
}

/// Read the end flag and whatever block it announces.
fn read_trailer(reader: &mut RecordReader<'_, '_>) -> Result<Trailer> {
    let flag = reader.i16("end_flag")?;

    match EndFlag::classify(flag) {
        EndFlag::LargeFlag => Ok(Trailer::Transform {
            flag,
            transform: reader.transform("trailer_transform")?,
        }),
        EndFlag::SmallFlagWithSkip => {
            reader.skip(1, "trailer_pad")?;
            let count_offset = reader.position();
            let count = reader.i16("trailer_skip_count")?;
            reader.skip(1, "trailer_pad")?;

            let skip = usize::try_from(i32::from(count) + 16).map_err(|_| Error::InvalidSkipLength {
                count,
                offset: count_offset,
            })?;
            reader.skip(skip, "trailer_skipped")?;

            let next_flag = reader.i16("trailer_next_flag")?;
            let transform = if EndFlag::classify(next_flag) == EndFlag::LargeFlag {
                Some(reader.transform("trailer_transform")?)
            } else {
                None
            };

            Ok(Trailer::Skipped {
                flag,
                count,
                next_flag,
                transform,
            })
        }
        EndFlag::NoTrailer => Ok(Trailer::None { flag }),
    }
}
