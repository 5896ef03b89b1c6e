//! Decoder configuration.

/// What to do with a vertex attribute whose `(data type, semantic)` pair has no known width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributePolicy {
    /// Fail the mesh with [`crate::Error::UnrecognizedAttribute`].
    #[default]
    Strict,
    /// Treat the attribute as zero bytes wide and leave it off the vertex.
    ///
    /// This desynchronizes the rest of the mesh if the attribute really has data.
    Lenient,
}

/// Options controlling a model decode.
///
/// # Example
///
/// ```
/// use snowmesh::formats::meshes::{AttributePolicy, DecodeOptions};
///
/// let options = DecodeOptions::new()
///     .with_attribute_policy(AttributePolicy::Lenient)
///     .with_trace(true);
/// assert!(options.trace);
/// ```
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Handling of unknown vertex attributes
    pub attribute_policy: AttributePolicy,

    /// Collect a structured field-by-field trace of the decode
    pub trace: bool,

    /// Upper bound for the header node count
    pub max_node_count: i32,

    /// Upper bound for the header mesh count
    pub max_mesh_count: i32,
}

impl DecodeOptions {
    /// Header count sanity limit used by the game's own files.
    pub const DEFAULT_MAX_COUNT: i32 = 10_000;

    /// Strict decoding without a trace.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attribute_policy: AttributePolicy::Strict,
            trace: false,
            max_node_count: Self::DEFAULT_MAX_COUNT,
            max_mesh_count: Self::DEFAULT_MAX_COUNT,
        }
    }

    #[must_use]
    pub fn with_attribute_policy(mut self, policy: AttributePolicy) -> Self {
        self.attribute_policy = policy;
        self
    }

    #[must_use]
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    #[must_use]
    pub fn with_max_node_count(mut self, max: i32) -> Self {
        self.max_node_count = max;
        self
    }

    #[must_use]
    pub fn with_max_mesh_count(mut self, max: i32) -> Self {
        self.max_mesh_count = max;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}
