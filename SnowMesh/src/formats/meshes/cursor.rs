//! Bounds-checked little-endian reader over an in-memory model buffer.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use byteorder::{ByteOrder, LittleEndian};

use super::types::Transform;
use crate::error::{Error, Result};

/// A fixed-width little-endian primitive the cursor can decode.
pub trait Primitive: Sized + Copy {
    /// Width in bytes.
    const WIDTH: usize;

    /// Decode from the first `WIDTH` bytes of `bytes`.
    fn decode(bytes: &[u8]) -> Self;
}

macro_rules! impl_primitive {
    ($ty:ty, $width:expr, |$b:ident| $body:expr) => {
        impl Primitive for $ty {
            const WIDTH: usize = $width;

            fn decode($b: &[u8]) -> Self {
                $body
            }
        }
    };
}

impl_primitive!(u8, 1, |b| b[0]);
impl_primitive!(i8, 1, |b| b[0] as i8);
impl_primitive!(u16, 2, |b| LittleEndian::read_u16(b));
impl_primitive!(i16, 2, |b| LittleEndian::read_i16(b));
impl_primitive!(u32, 4, |b| LittleEndian::read_u32(b));
impl_primitive!(i32, 4, |b| LittleEndian::read_i32(b));
impl_primitive!(f32, 4, |b| LittleEndian::read_f32(b));
impl_primitive!(f64, 8, |b| LittleEndian::read_f64(b));

/// Sequential reader with a single advancing offset.
///
/// Every read either succeeds completely or fails with [`Error::OutOfBounds`]
/// and leaves the offset untouched.
#[derive(Debug, Clone)]
pub struct ModelCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ModelCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left after the current offset.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Total buffer size.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    fn out_of_bounds(&self, requested: usize) -> Error {
        Error::OutOfBounds {
            offset: self.offset,
            requested,
            remaining: self.remaining(),
        }
    }

    /// Fail unless `count` elements of `width` bytes each fit in the rest of the buffer.
    pub fn ensure(&self, count: usize, width: usize) -> Result<()> {
        let requested = count.checked_mul(width).unwrap_or(usize::MAX);
        if requested > self.remaining() {
            return Err(self.out_of_bounds(requested));
        }
        Ok(())
    }

    /// Read `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n, 1)?;
        let bytes = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    /// Return the next `n` bytes without advancing.
    pub fn peek(&self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n, 1)?;
        Ok(&self.data[self.offset..self.offset + n])
    }

    /// Advance past `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    /// Read `count` values of `T`.
    pub fn read<T: Primitive>(&mut self, count: usize) -> Result<Vec<T>> {
        self.ensure(count, T::WIDTH)?;
        let bytes = self.read_bytes(count * T::WIDTH)?;
        Ok(bytes.chunks_exact(T::WIDTH).map(T::decode).collect())
    }

    /// Read exactly `N` values of `T`.
    pub fn read_array<T: Primitive, const N: usize>(&mut self) -> Result<[T; N]> {
        let bytes = self.read_bytes(N * T::WIDTH)?;
        Ok(std::array::from_fn(|i| T::decode(&bytes[i * T::WIDTH..])))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_array::<u8, 1>().map(|[v]| v)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_array::<i16, 1>().map(|[v]| v)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_array::<i32, 1>().map(|[v]| v)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_array::<f64, 1>().map(|[v]| v)
    }

    pub fn read_vec3(&mut self) -> Result<[f32; 3]> {
        self.read_array()
    }

    pub fn read_vec4(&mut self) -> Result<[f32; 4]> {
        self.read_array()
    }

    /// Read four vector4 rows.
    pub fn read_transform(&mut self) -> Result<Transform> {
        self.ensure(4, 16)?;
        Ok(Transform {
            rows: [
                self.read_vec4()?,
                self.read_vec4()?,
                self.read_vec4()?,
                self.read_vec4()?,
            ],
        })
    }

    /// Read an int32 length followed by that many bytes of text.
    ///
    /// The stored length counts a trailing NUL, which is dropped. A length of
    /// zero or less yields an empty name and consumes nothing further.
    pub fn read_prefixed_name(&mut self) -> Result<String> {
        let length = LittleEndian::read_i32(self.peek(4)?);
        let body = usize::try_from(length).unwrap_or(0);
        self.ensure(4 + body, 1)?;
        self.skip(4)?;
        let bytes = self.read_bytes(body)?;
        let bytes = bytes.strip_suffix(&[0]).unwrap_or(bytes);
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let data = [0x01, 0x00, 0xFE, 0xFF, 0x00, 0x00, 0x80, 0x3F];
        let mut cursor = ModelCursor::new(&data);
        assert_eq!(cursor.read_i16().unwrap(), 1);
        assert_eq!(cursor.read_i16().unwrap(), -2);
        assert_eq!(cursor.read_array::<f32, 1>().unwrap(), [1.0]);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_read_counted_values() {
        let data = [1, 0, 2, 0, 3, 0];
        let mut cursor = ModelCursor::new(&data);
        assert_eq!(cursor.read::<u16>(3).unwrap(), vec![1, 2, 3]);
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn test_bounds_error_leaves_offset() {
        let data = [0u8; 6];
        let mut cursor = ModelCursor::new(&data);
        cursor.skip(4).unwrap();

        let err = cursor.read_i32().unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfBounds { offset: 4, requested: 4, remaining: 2 }
        ));
        assert_eq!(cursor.position(), 4);

        assert!(cursor.read::<i32>(usize::MAX).is_err());
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [9, 8, 7, 6];
        let cursor = ModelCursor::new(&data);
        assert_eq!(cursor.peek(4).unwrap(), &[9, 8, 7, 6]);
        assert_eq!(cursor.position(), 0);
        assert!(cursor.peek(5).is_err());
    }

    #[test]
    fn test_prefixed_name_strips_terminator() {
        let mut data = 5i32.to_le_bytes().to_vec();
        data.extend_from_slice(b"hull\0");
        let mut cursor = ModelCursor::new(&data);
        assert_eq!(cursor.read_prefixed_name().unwrap(), "hull");
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_prefixed_name_empty_length() {
        let data = 0i32.to_le_bytes();
        let mut cursor = ModelCursor::new(&data);
        assert_eq!(cursor.read_prefixed_name().unwrap(), "");
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_prefixed_name_overlong() {
        let mut data = 64i32.to_le_bytes().to_vec();
        data.extend_from_slice(b"abc");
        let mut cursor = ModelCursor::new(&data);
        assert!(matches!(
            cursor.read_prefixed_name(),
            Err(Error::OutOfBounds { requested: 68, offset: 0, .. })
        ));
        assert_eq!(cursor.position(), 0);
    }
}
