//! Node (bone) records.
//!
//! ```text
//! int16 parent_id | int16 node_id | int16 link_in_count | int16 reserved
//! int32 name_length | bytes[name_length] name (NUL terminated)
//! vector4 x 4 transform
//! ```

use super::reader::RecordReader;
use super::types::NodeRecord;
use crate::error::Result;

/// Decode one node record. `link_in_count` on the result selects the extra
/// index of a following simple-layout mesh.
pub(crate) fn read_node(reader: &mut RecordReader<'_, '_>) -> Result<NodeRecord> {
    let [parent_id, node_id, link_in_count, reserved] = reader.i16s("node_ids")?;
    let name = reader.name("node_name")?;
    let transform = reader.transform("node_transform")?;

    tracing::debug!(
        "Node {} '{}' (parent {}, link_in_count {})",
        node_id,
        name,
        parent_id,
        link_in_count
    );

    Ok(NodeRecord {
        parent_id,
        node_id,
        link_in_count,
        reserved,
        name,
        transform,
    })
}
