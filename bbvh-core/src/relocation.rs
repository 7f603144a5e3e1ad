//! Relocation (trailer) chunk
//!
//! The trailer stores two compressed pointers: each offset is divided by four
//! and tagged with `0x40`, then truncated to a single byte. Offsets whose
//! quarter exceeds `0x3F` collide with the flag bit and are not recoverable.

use crate::buffer::{fit_u32, ChunkBuffer, Placeholder};
use crate::constants::{RELOCATION_FLAG, RELOCATION_TAG};
use crate::error::EncodeError;
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use tracing::debug;

/// Compressed offsets stored in the trailer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationCodes {
    /// `(motion_pointer >> 2) | 0x40`
    pub motion: u8,

    /// `((motion - hierarchy_pointer) >> 2) | 0x40`
    pub hierarchy: u8,
}

impl RelocationCodes {
    /// Compress the chunk pointers
    pub fn new(hierarchy_pointer: usize, motion_pointer: usize) -> Self {
        let motion = ((motion_pointer >> 2) as u8) | RELOCATION_FLAG;
        let delta = i64::from(motion) - hierarchy_pointer as i64;
        let hierarchy = ((delta >> 2) as u8) | RELOCATION_FLAG;
        Self { motion, hierarchy }
    }
}

/// Trailer chunk whose size field is still waiting for the final container size
#[derive(Debug)]
pub struct RelocationChunk {
    /// Offset of the chunk tag
    pub pointer: usize,

    /// Codes written into the chunk
    pub codes: RelocationCodes,

    /// Aligned end offset of the chunk, which is the container size
    pub end: usize,

    size_field: Placeholder,
}

impl RelocationChunk {
    /// Backpatch the trailer's size field with the aligned end offset
    pub fn finish(self, buf: &mut ChunkBuffer) -> Result<usize, EncodeError> {
        buf.patch_u32(self.size_field, fit_u32("relocation size", self.end)?);
        Ok(self.end)
    }
}

/// Append the trailer chunk at the cursor and pad it to the next boundary
pub fn write_relocation(
    buf: &mut ChunkBuffer,
    hierarchy_pointer: usize,
    motion_pointer: usize,
) -> RelocationChunk {
    let pointer = buf.position();
    buf.put_slice(RELOCATION_TAG);
    let size_field = buf.reserve(4);

    let codes = RelocationCodes::new(hierarchy_pointer, motion_pointer);
    buf.put_u8(codes.motion);
    buf.put_u8(codes.hierarchy);

    let end = buf.align();

    #[cfg(feature = "logging")]
    debug!(
        "Wrote relocation chunk at {} (motion code {:#04x}, hierarchy code {:#04x})",
        pointer, codes.motion, codes.hierarchy
    );

    RelocationChunk {
        pointer,
        codes,
        end,
        size_field,
    }
}
