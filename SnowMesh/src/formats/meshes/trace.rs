//! Structured decode trace.
//!
//! When enabled, the decoder records every field it reads as an
//! `(offset, field, value)` entry. Rendering the trace is left to callers
//! (see [`super::inspect::render_transcript`]).

use serde::Serialize;

use super::types::Transform;
use super::vertex::ChannelValue;

/// A traced field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TraceValue {
    Int(i64),
    Ints(Vec<i64>),
    Floats(Vec<f32>),
    Text(String),
    Rows([[f32; 4]; 4]),
    Channel(ChannelValue),
    /// A run of skipped bytes.
    Skipped(usize),
}

impl From<i16> for TraceValue {
    fn from(v: i16) -> Self {
        TraceValue::Int(v.into())
    }
}

impl From<i32> for TraceValue {
    fn from(v: i32) -> Self {
        TraceValue::Int(v.into())
    }
}

impl From<usize> for TraceValue {
    fn from(v: usize) -> Self {
        TraceValue::Int(v as i64)
    }
}

impl<const N: usize> From<[f32; N]> for TraceValue {
    fn from(v: [f32; N]) -> Self {
        TraceValue::Floats(v.to_vec())
    }
}

impl<const N: usize> From<[i16; N]> for TraceValue {
    fn from(v: [i16; N]) -> Self {
        TraceValue::Ints(v.iter().map(|&x| x.into()).collect())
    }
}

impl<const N: usize> From<[i32; N]> for TraceValue {
    fn from(v: [i32; N]) -> Self {
        TraceValue::Ints(v.iter().map(|&x| x.into()).collect())
    }
}

impl<const N: usize> From<[u16; N]> for TraceValue {
    fn from(v: [u16; N]) -> Self {
        TraceValue::Ints(v.iter().map(|&x| x.into()).collect())
    }
}

impl From<&str> for TraceValue {
    fn from(v: &str) -> Self {
        TraceValue::Text(v.to_string())
    }
}

impl From<Transform> for TraceValue {
    fn from(v: Transform) -> Self {
        TraceValue::Rows(v.rows)
    }
}

impl From<ChannelValue> for TraceValue {
    fn from(v: ChannelValue) -> Self {
        TraceValue::Channel(v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub offset: usize,
    pub field: &'static str,
    pub value: TraceValue,
}

/// Collected trace entries; a disabled trace drops everything.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Trace {
    #[serde(skip)]
    enabled: bool,
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&mut self, offset: usize, field: &'static str, value: impl Into<TraceValue>) {
        if self.enabled {
            self.entries.push(TraceEntry {
                offset,
                field,
                value: value.into(),
            });
        }
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_trace_records_nothing() {
        let mut trace = Trace::default();
        trace.record(0, "node_count", 3i32);
        assert!(trace.is_empty());
    }

    #[test]
    fn test_enabled_trace_keeps_order() {
        let mut trace = Trace::new(true);
        trace.record(0, "xml_length", 6i32);
        trace.record(4, "xml", "<a/>");
        trace.record(8, "spacer", [1i16, 2, 3]);

        let fields: Vec<_> = trace.entries().iter().map(|e| (e.offset, e.field)).collect();
        assert_eq!(fields, vec![(0, "xml_length"), (4, "xml"), (8, "spacer")]);
        assert_eq!(trace.entries()[2].value, TraceValue::Ints(vec![1, 2, 3]));
    }
}
