//! Per-mesh vertex layouts.
//!
//! Each mesh stores a table of attribute descriptors that describes the binary
//! layout of its vertices. The table is resolved once against [`CODECS`] and
//! then used to decode every vertex of the mesh.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use glam::Vec3;
use serde::Serialize;

use super::cursor::ModelCursor;
use super::options::AttributePolicy;
use super::trace::Trace;
use super::types::{Channel, Vertex};
use crate::error::{Error, Result};

/// Storage type of one vertex channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataType {
    Vector3,
    Vector2,
    Packed4,
    /// Code 5 and any unmapped code; the semantic decides the width.
    Opaque(i16),
}

impl DataType {
    pub fn from_code(code: i16) -> Self {
        match code {
            2 => Self::Vector3,
            1 => Self::Vector2,
            8 => Self::Packed4,
            _ => Self::Opaque(code),
        }
    }

    pub fn code(self) -> i16 {
        match self {
            Self::Vector3 => 2,
            Self::Vector2 => 1,
            Self::Packed4 => 8,
            Self::Opaque(code) => code,
        }
    }
}

/// Meaning of one vertex channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Semantic {
    Position,
    Uv,
    Normal,
    Unknown205,
    Unknown305,
    Weight,
    Link,
    Unknown605,
    Other(i16),
}

impl Semantic {
    pub fn from_code(code: i16) -> Self {
        match code {
            0x0000 => Self::Position,
            0x0005 => Self::Uv,
            0x0105 => Self::Normal,
            0x0205 => Self::Unknown205,
            0x0305 => Self::Unknown305,
            0x0405 => Self::Weight,
            0x0505 => Self::Link,
            0x0605 => Self::Unknown605,
            _ => Self::Other(code),
        }
    }

    pub fn code(self) -> i16 {
        match self {
            Self::Position => 0x0000,
            Self::Uv => 0x0005,
            Self::Normal => 0x0105,
            Self::Unknown205 => 0x0205,
            Self::Unknown305 => 0x0305,
            Self::Weight => 0x0405,
            Self::Link => 0x0505,
            Self::Unknown605 => 0x0605,
            Self::Other(code) => code,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Uv => "uv",
            Self::Normal => "normal",
            Self::Unknown205 => "unknown205",
            Self::Unknown305 => "unknown305",
            Self::Weight => "weight",
            Self::Link => "link",
            Self::Unknown605 => "unknown605",
            Self::Other(_) => "unknown",
        }
    }
}

/// One entry of a mesh's vertex attribute table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeDescriptor {
    pub unknown: i16,
    pub offset_hint: i16,
    pub data_type: DataType,
    pub semantic: Semantic,
}

impl AttributeDescriptor {
    pub fn from_raw([unknown, offset_hint, data_type, semantic]: [i16; 4]) -> Self {
        Self {
            unknown,
            offset_hint,
            data_type: DataType::from_code(data_type),
            semantic: Semantic::from_code(semantic),
        }
    }
}

/// A decoded channel value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ChannelValue {
    Float3([f32; 3]),
    Float2([f32; 2]),
    Bytes([u8; 4]),
    SignedBytes([i8; 4]),
    Normal { raw: [i8; 4], unit: [f32; 3] },
    Double(f64),
}

/// Map signed normal bytes to a unit vector: `(b / 255) * 2 - 1`, then normalize.
///
/// A zero-length result stays zero.
pub fn unpack_normal(raw: [i8; 4]) -> [f32; 3] {
    let map = |b: i8| (f32::from(b) / 255.0) * 2.0 - 1.0;
    Vec3::new(map(raw[0]), map(raw[1]), map(raw[2]))
        .normalize_or_zero()
        .to_array()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeKey {
    Vector3,
    Vector2,
    Packed4,
    Opaque,
}

impl From<DataType> for TypeKey {
    fn from(data_type: DataType) -> Self {
        match data_type {
            DataType::Vector3 => TypeKey::Vector3,
            DataType::Vector2 => TypeKey::Vector2,
            DataType::Packed4 => TypeKey::Packed4,
            DataType::Opaque(_) => TypeKey::Opaque,
        }
    }
}

/// How to decode one `(data type, semantic)` pair.
#[derive(Debug)]
pub struct ChannelCodec {
    data_type: TypeKey,
    /// `None` matches any semantic.
    semantic: Option<Semantic>,
    /// Bytes consumed per vertex.
    pub width: usize,
    /// Whether the value is kept on the vertex.
    pub keep: bool,
    decode: fn(&mut ModelCursor<'_>) -> Result<ChannelValue>,
}

fn decode_float3(cursor: &mut ModelCursor<'_>) -> Result<ChannelValue> {
    cursor.read_array().map(ChannelValue::Float3)
}

fn decode_float2(cursor: &mut ModelCursor<'_>) -> Result<ChannelValue> {
    cursor.read_array().map(ChannelValue::Float2)
}

fn decode_bytes(cursor: &mut ModelCursor<'_>) -> Result<ChannelValue> {
    cursor.read_array().map(ChannelValue::Bytes)
}

fn decode_signed_bytes(cursor: &mut ModelCursor<'_>) -> Result<ChannelValue> {
    cursor.read_array().map(ChannelValue::SignedBytes)
}

fn decode_normal(cursor: &mut ModelCursor<'_>) -> Result<ChannelValue> {
    let raw: [i8; 4] = cursor.read_array()?;
    Ok(ChannelValue::Normal { raw, unit: unpack_normal(raw) })
}

fn decode_double(cursor: &mut ModelCursor<'_>) -> Result<ChannelValue> {
    cursor.read_f64().map(ChannelValue::Double)
}

/// Known channel encodings. Exact semantic matches must precede wildcards of
/// the same type key; new attribute kinds are added here.
pub static CODECS: &[ChannelCodec] = &[
    ChannelCodec { data_type: TypeKey::Vector3, semantic: None, width: 12, keep: true, decode: decode_float3 },
    ChannelCodec { data_type: TypeKey::Vector2, semantic: None, width: 8, keep: true, decode: decode_float2 },
    ChannelCodec { data_type: TypeKey::Packed4, semantic: None, width: 4, keep: true, decode: decode_bytes },
    ChannelCodec { data_type: TypeKey::Opaque, semantic: Some(Semantic::Weight), width: 4, keep: true, decode: decode_signed_bytes },
    ChannelCodec { data_type: TypeKey::Opaque, semantic: Some(Semantic::Normal), width: 4, keep: true, decode: decode_normal },
    ChannelCodec { data_type: TypeKey::Opaque, semantic: Some(Semantic::Link), width: 4, keep: true, decode: decode_bytes },
    ChannelCodec { data_type: TypeKey::Opaque, semantic: Some(Semantic::Unknown605), width: 8, keep: false, decode: decode_double },
];

/// Find the codec for a descriptor.
pub fn lookup_codec(descriptor: &AttributeDescriptor) -> Option<&'static ChannelCodec> {
    let key = TypeKey::from(descriptor.data_type);
    CODECS
        .iter()
        .find(|c| c.data_type == key && c.semantic.is_none_or(|s| s == descriptor.semantic))
}

/// A resolved attribute table.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    slots: Vec<(AttributeDescriptor, Option<&'static ChannelCodec>)>,
}

impl VertexLayout {
    /// Resolve every descriptor to a codec.
    ///
    /// Under [`AttributePolicy::Strict`] an unknown pair fails with
    /// [`Error::UnrecognizedAttribute`]; under [`AttributePolicy::Lenient`] it
    /// occupies zero bytes and is left off every vertex.
    pub fn resolve(
        descriptors: &[AttributeDescriptor],
        policy: AttributePolicy,
        table_offset: usize,
    ) -> Result<Self> {
        let mut slots = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let codec = lookup_codec(descriptor);
            if codec.is_none() {
                match policy {
                    AttributePolicy::Strict => {
                        return Err(Error::UnrecognizedAttribute {
                            data_type: descriptor.data_type.code(),
                            semantic: descriptor.semantic.code(),
                            offset: table_offset,
                        });
                    }
                    AttributePolicy::Lenient => {
                        tracing::warn!(
                            "Skipping unrecognized vertex attribute (type {}, semantic {:#06x}); assuming zero width",
                            descriptor.data_type.code(),
                            descriptor.semantic.code()
                        );
                    }
                }
            }
            slots.push((*descriptor, codec));
        }
        Ok(Self { slots })
    }

    /// Bytes per vertex.
    pub fn stride(&self) -> usize {
        self.slots
            .iter()
            .filter_map(|(_, codec)| codec.map(|c| c.width))
            .sum()
    }

    /// Decode one vertex at the cursor.
    pub fn read_vertex(&self, cursor: &mut ModelCursor<'_>, trace: &mut Trace) -> Result<Vertex> {
        let mut vertex = Vertex {
            channels: Vec::with_capacity(self.slots.len()),
        };

        for (descriptor, codec) in &self.slots {
            let Some(codec) = codec else { continue };
            let offset = cursor.position();
            let value = (codec.decode)(cursor)?;
            trace.record(offset, descriptor.semantic.name(), value);
            if codec.keep {
                vertex.channels.push(Channel {
                    semantic: descriptor.semantic,
                    value,
                });
            }
        }

        Ok(vertex)
    }
}
