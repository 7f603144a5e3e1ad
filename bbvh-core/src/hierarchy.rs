//! Hierarchy chunk writer
//!
//! Layout, relative to the end of the `CRAH` tag:
//!
//! | offset | field                              | width    |
//! |--------|------------------------------------|----------|
//! | 0      | aligned end offset of the chunk    | 2 bytes  |
//! | 5      | joint count                        | 1 byte   |
//! | 6      | total channel count                | 1 byte   |
//! | 11..   | per joint: index, count, codes     | variable |
//!
//! The first 60 bytes after the tag are always present, so the chunk spans at
//! least one full 64-byte block.

use crate::buffer::{fit_u16, fit_u8, ChunkBuffer};
use crate::constants::{
    HIERARCHY_CHANNEL_COUNT_OFFSET, HIERARCHY_JOINTS_OFFSET, HIERARCHY_JOINT_COUNT_OFFSET,
    HIERARCHY_RESERVED, HIERARCHY_TAG,
};
use crate::error::EncodeError;
use crate::types::ParsedDocument;

#[cfg(feature = "logging")]
use tracing::debug;

/// Position of a written hierarchy chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyChunk {
    /// Offset right after the chunk tag
    pub pointer: usize,

    /// Aligned end offset, also stored in the chunk's size field
    pub end: usize,
}

/// Append the hierarchy chunk for `doc` at the cursor
pub fn write_hierarchy(
    buf: &mut ChunkBuffer,
    doc: &ParsedDocument,
) -> Result<HierarchyChunk, EncodeError> {
    let joint_count = fit_u8("joint count", doc.joint_count)?;
    let channel_count = fit_u8("channel count", doc.channel_stride())?;

    buf.put_slice(HIERARCHY_TAG);
    let chunk_start = buf.position();

    let size_field = buf.reserve(2);
    buf.pad_to(chunk_start + HIERARCHY_JOINT_COUNT_OFFSET);
    buf.put_u8(joint_count);
    debug_assert_eq!(buf.position(), chunk_start + HIERARCHY_CHANNEL_COUNT_OFFSET);
    buf.put_u8(channel_count);
    buf.pad_to(chunk_start + HIERARCHY_JOINTS_OFFSET);

    for (index, joint) in doc.channel_schema.iter().enumerate() {
        buf.put_u8(fit_u8("joint index", index)?);
        // the stored count is the number of codes that follow it
        fit_u8("joint channel count", joint.count.max(joint.width()))?;
        buf.put_u8(fit_u8("joint channel count", joint.width())?);
        for kind in &joint.kinds {
            buf.put_u8(kind.code());
        }
    }

    buf.pad_to(chunk_start + HIERARCHY_RESERVED);
    let end = buf.align();
    buf.patch_u16(size_field, fit_u16("hierarchy size", end)?);

    #[cfg(feature = "logging")]
    debug!(
        "Wrote hierarchy chunk at {} ({} joints, {} channels, end {})",
        chunk_start, joint_count, channel_count, end
    );

    Ok(HierarchyChunk {
        pointer: chunk_start,
        end,
    })
}
