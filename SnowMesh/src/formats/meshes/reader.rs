//! Field-level reader shared by the record decoders.
//!
//! Wraps the cursor so every named field is traced at the offset it was read from.

use super::cursor::ModelCursor;
use super::options::DecodeOptions;
use super::trace::Trace;
use super::types::{BoundingBox, Transform};
use crate::error::{Error, Result};

pub(crate) struct RecordReader<'a, 'o> {
    pub cursor: ModelCursor<'a>,
    pub trace: Trace,
    pub options: &'o DecodeOptions,
}

impl<'a, 'o> RecordReader<'a, 'o> {
    pub fn new(data: &'a [u8], options: &'o DecodeOptions) -> Self {
        Self {
            cursor: ModelCursor::new(data),
            trace: Trace::new(options.trace),
            options,
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn i16(&mut self, field: &'static str) -> Result<i16> {
        let offset = self.position();
        let value = self.cursor.read_i16()?;
        self.trace.record(offset, field, value);
        Ok(value)
    }

    pub fn i32(&mut self, field: &'static str) -> Result<i32> {
        let offset = self.position();
        let value = self.cursor.read_i32()?;
        self.trace.record(offset, field, value);
        Ok(value)
    }

    /// An int32 count that must not be negative.
    pub fn count(&mut self, field: &'static str) -> Result<usize> {
        let offset = self.position();
        let value = self.i32(field)?;
        usize::try_from(value).map_err(|_| Error::NegativeLength {
            field,
            value: value.into(),
            offset,
        })
    }

    pub fn i16s<const N: usize>(&mut self, field: &'static str) -> Result<[i16; N]> {
        let offset = self.position();
        let value = self.cursor.read_array()?;
        self.trace.record(offset, field, value);
        Ok(value)
    }

    pub fn i32s<const N: usize>(&mut self, field: &'static str) -> Result<[i32; N]> {
        let offset = self.position();
        let value = self.cursor.read_array()?;
        self.trace.record(offset, field, value);
        Ok(value)
    }

    pub fn vec3(&mut self, field: &'static str) -> Result<[f32; 3]> {
        let offset = self.position();
        let value = self.cursor.read_vec3()?;
        self.trace.record(offset, field, value);
        Ok(value)
    }

    pub fn bounds(&mut self) -> Result<BoundingBox> {
        Ok(BoundingBox {
            min: self.vec3("bounds_min")?,
            max: self.vec3("bounds_max")?,
        })
    }

    pub fn transform(&mut self, field: &'static str) -> Result<Transform> {
        let offset = self.position();
        let value = self.cursor.read_transform()?;
        self.trace.record(offset, field, value);
        Ok(value)
    }

    /// `count` transforms, after checking they fit.
    pub fn transforms(&mut self, count: usize, field: &'static str) -> Result<Vec<Transform>> {
        self.cursor.ensure(count, 64)?;
        (0..count).map(|_| self.transform(field)).collect()
    }

    pub fn name(&mut self, field: &'static str) -> Result<String> {
        let offset = self.position();
        let value = self.cursor.read_prefixed_name()?;
        self.trace.record(offset, field, value.as_str());
        Ok(value)
    }

    pub fn skip(&mut self, n: usize, field: &'static str) -> Result<()> {
        let offset = self.position();
        self.cursor.skip(n)?;
        self.trace.record(offset, field, super::trace::TraceValue::Skipped(n));
        Ok(())
    }
}
