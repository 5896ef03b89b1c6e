//! Error types for `SnowMesh`

use thiserror::Error;

/// The error type for `SnowMesh` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Bounds Errors ====================
    /// A read would run past the end of the buffer.
    #[error("read of {requested} bytes at offset {offset} exceeds buffer ({remaining} bytes remaining)")]
    OutOfBounds {
        /// Offset the read started at.
        offset: usize,
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes left in the buffer.
        remaining: usize,
    },

    // ==================== Header Format Errors ====================
    /// The xml blob length in the file header is outside the buffer.
    #[error("invalid xml length: {length} (buffer is {buffer_len} bytes)")]
    InvalidXmlLength {
        /// The declared xml length.
        length: i32,
        /// Total size of the input buffer.
        buffer_len: usize,
    },

    /// The header node count is outside the sanity range.
    #[error("invalid node count: {count} (allowed 0..={max})")]
    InvalidNodeCount {
        /// The declared node count.
        count: i32,
        /// The configured upper bound.
        max: i32,
    },

    /// The header mesh count is outside the sanity range.
    #[error("invalid mesh count: {count} (allowed 0..={max})")]
    InvalidMeshCount {
        /// The declared mesh count.
        count: i32,
        /// The configured upper bound.
        max: i32,
    },

    // ==================== Record Decode Errors ====================
    /// A count or length field holds a negative value.
    #[error("negative {field} ({value}) at offset {offset}")]
    NegativeLength {
        /// Name of the field.
        field: &'static str,
        /// The value read.
        value: i64,
        /// Offset of the field.
        offset: usize,
    },

    /// A vertex attribute descriptor names a type/semantic pair with no known width.
    #[error("unrecognized vertex attribute (data type {data_type}, semantic {semantic:#06x}) at offset {offset}")]
    UnrecognizedAttribute {
        /// Raw data type code.
        data_type: i16,
        /// Raw item semantic code.
        semantic: i16,
        /// Offset of the vertex being decoded.
        offset: usize,
    },

    /// Vertices are declared but the attribute table gives them no width.
    #[error("{count} vertices declared with an empty vertex layout at offset {offset}")]
    EmptyVertexLayout {
        /// Declared vertex count.
        count: usize,
        /// Offset of the attribute table.
        offset: usize,
    },

    /// A submesh range is empty, inverted or outside the mesh.
    #[error("submesh {index} has invalid {what} range {start}..={end} (limit {limit})")]
    InvalidSubmeshRange {
        /// Submesh position in the mesh's submesh list.
        index: usize,
        /// "triangle" or "vertex".
        what: &'static str,
        /// First element (inclusive).
        start: i64,
        /// Last element (inclusive).
        end: i64,
        /// Declared element count of the mesh.
        limit: i32,
    },

    /// The small-flag trailer declares a skip that would move backwards.
    #[error("invalid trailer skip length {count} at offset {offset}")]
    InvalidSkipLength {
        /// The declared count.
        count: i16,
        /// Offset of the count field.
        offset: usize,
    },

    /// More mesh records were found than the header declared.
    #[error("mesh record at offset {offset} exceeds declared mesh count {declared}")]
    MeshCountExceeded {
        /// Mesh count from the file header.
        declared: i32,
        /// Offset of the surplus mesh record.
        offset: usize,
    },

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ==================== File System Errors ====================
    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

/// Coarse classification of an [`Error`].
///
/// Header `Format` errors abort the whole parse, `Bounds` and `Decode` errors
/// only abort the record being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ErrorKind {
    Bounds,
    Format,
    Decode,
    Io,
    Parse,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::OutOfBounds { .. } => ErrorKind::Bounds,
            Error::InvalidXmlLength { .. }
            | Error::InvalidNodeCount { .. }
            | Error::InvalidMeshCount { .. } => ErrorKind::Format,
            Error::NegativeLength { .. }
            | Error::UnrecognizedAttribute { .. }
            | Error::EmptyVertexLayout { .. }
            | Error::InvalidSubmeshRange { .. }
            | Error::InvalidSkipLength { .. }
            | Error::MeshCountExceeded { .. } => ErrorKind::Decode,
            Error::Io(_) | Error::WalkDirError(_) => ErrorKind::Io,
            Error::XmlError(_) | Error::XmlAttrError(_) | Error::JsonError(_) => ErrorKind::Parse,
        }
    }
}

// Add conversion from quick_xml::events::attributes::AttrError
impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `SnowMesh` operations.
pub type Result<T> = std::result::Result<T, Error>;
