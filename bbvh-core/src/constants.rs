//! Constants for the BBVH container format

/// Container magic, stored little-endian in the first 4 bytes of the header
pub const CONTAINER_MAGIC: u32 = 0x4242_5648;

/// Optional end marker appended after the aligned end of the container
pub const END_MARKER: u32 = 0x454E_4421;

/// Hierarchy chunk tag
pub const HIERARCHY_TAG: &[u8; 4] = b"CRAH";

/// Motion chunk tag
pub const MOTION_TAG: &[u8; 4] = b"NTOM";

/// Relocation (trailer) chunk tag
pub const RELOCATION_TAG: &[u8; 4] = b"TIXE";

/// Every chunk boundary is a multiple of this many bytes
pub const CHUNK_ALIGNMENT: usize = 64;

/// Size of the container header (magic + total size + reserved bytes)
pub const HEADER_SIZE: usize = 64;

/// Offset of the total-size field inside the header
pub const HEADER_SIZE_FIELD_OFFSET: usize = 4;

/// Bytes reserved after the hierarchy tag before the joint table is written
pub const HIERARCHY_RESERVED: usize = 60;

/// Offset of the joint count, relative to the end of the hierarchy tag
pub const HIERARCHY_JOINT_COUNT_OFFSET: usize = 5;

/// Offset of the total channel count, relative to the end of the hierarchy tag
pub const HIERARCHY_CHANNEL_COUNT_OFFSET: usize = 6;

/// Offset of the first joint record, relative to the end of the hierarchy tag
pub const HIERARCHY_JOINTS_OFFSET: usize = 11;

/// Widest per-joint channel count the hierarchy chunk can store
pub const MAX_JOINT_CHANNELS: usize = u8::MAX as usize;

/// Size of the motion chunk header (tag + size + frame count + frame time)
pub const MOTION_HEADER_SIZE: usize = 16;

/// Flag set in the first byte of an 8-bit frame length prefix
pub const FRAME_FLAG_U8: u8 = 0x80;

/// Flag set in the first half-word of a 16-bit frame length prefix
pub const FRAME_FLAG_U16: u16 = 0x8000;

/// Flag tagged onto each compressed relocation offset
pub const RELOCATION_FLAG: u8 = 0x40;

/// Channel code for unrecognized channel tokens
pub const UNKNOWN_CHANNEL_CODE: u8 = 0xFF;

/// Round `offset` up to the next chunk boundary
pub const fn align_up(offset: usize) -> usize {
    (offset + CHUNK_ALIGNMENT - 1) & !(CHUNK_ALIGNMENT - 1)
}
