//! Synthetic model files for integration tests.

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};

pub const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Little-endian writer for model files.
#[derive(Default)]
pub struct ModelWriter {
    buf: Vec<u8>,
}

impl ModelWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn i16(&mut self, v: i16) -> &mut Self {
        self.buf.write_i16::<LittleEndian>(v).unwrap();
        self
    }

    pub fn i16s(&mut self, values: &[i16]) -> &mut Self {
        values.iter().for_each(|&v| {
            self.i16(v);
        });
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.write_i32::<LittleEndian>(v).unwrap();
        self
    }

    pub fn i32s(&mut self, values: &[i32]) -> &mut Self {
        values.iter().for_each(|&v| {
            self.i32(v);
        });
        self
    }

    pub fn f32s(&mut self, values: &[f32]) -> &mut Self {
        for &v in values {
            self.buf.write_f32::<LittleEndian>(v).unwrap();
        }
        self
    }

    pub fn f64(&mut self, v: f64) -> &mut Self {
        self.buf.write_f64::<LittleEndian>(v).unwrap();
        self
    }

    pub fn u16s(&mut self, values: &[u16]) -> &mut Self {
        for &v in values {
            self.buf.write_u16::<LittleEndian>(v).unwrap();
        }
        self
    }

    pub fn bytes(&mut self, b: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(b);
        self
    }

    pub fn name(&mut self, s: &str) -> &mut Self {
        self.i32(s.len() as i32 + 1).bytes(s.as_bytes()).bytes(&[0])
    }

    pub fn transform(&mut self, rows: &[[f32; 4]; 4]) -> &mut Self {
        for row in rows {
            self.f32s(row);
        }
        self
    }

    /// File header with the given xml blob and counts.
    pub fn header(&mut self, xml: &str, node_count: i32, mesh_count: i32) -> &mut Self {
        self.i32(xml.len() as i32 + 2).bytes(xml.as_bytes());
        self.i16s(&[0, 0, 0]).i32(node_count);
        self.f32s(&[-2.0, -2.0, -2.0, 2.0, 2.0, 2.0]);
        self.i32(mesh_count)
    }

    pub fn node(&mut self, parent_id: i16, node_id: i16, link_in_count: i16, name: &str) -> &mut Self {
        self.i16s(&[parent_id, node_id, link_in_count, 0])
            .name(name)
            .transform(&IDENTITY)
    }

    /// The zero word that says no mesh follows a node.
    pub fn no_mesh(&mut self) -> &mut Self {
        self.i32(0)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
