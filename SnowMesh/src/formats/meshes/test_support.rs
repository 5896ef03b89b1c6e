//! Little-endian byte builder for decoder tests.

use byteorder::{LittleEndian, WriteBytesExt};

#[derive(Debug, Default)]
pub(crate) struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn i16(&mut self, v: i16) -> &mut Self {
        self.buf.write_i16::<LittleEndian>(v).unwrap();
        self
    }

    pub fn i16s(&mut self, values: &[i16]) -> &mut Self {
        for &v in values {
            self.i16(v);
        }
        self
    }

    pub fn u16s(&mut self, values: &[u16]) -> &mut Self {
        for &v in values {
            self.buf.write_u16::<LittleEndian>(v).unwrap();
        }
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.write_i32::<LittleEndian>(v).unwrap();
        self
    }

    pub fn i32s(&mut self, values: &[i32]) -> &mut Self {
        for &v in values {
            self.i32(v);
        }
        self
    }

    pub fn f32s(&mut self, values: &[f32]) -> &mut Self {
        for &v in values {
            self.buf.write_f32::<LittleEndian>(v).unwrap();
        }
        self
    }

    pub fn vec3(&mut self, v: [f32; 3]) -> &mut Self {
        self.f32s(&v)
    }

    pub fn transform(&mut self, rows: &[[f32; 4]; 4]) -> &mut Self {
        for row in rows {
            self.f32s(row);
        }
        self
    }

    /// int32 length (including the terminator) followed by the bytes and a NUL.
    pub fn name(&mut self, s: &str) -> &mut Self {
        self.i32(s.len() as i32 + 1);
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        self
    }

    pub fn bytes(&mut self, b: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(b);
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
