//! Growable container buffer with reserved fields and backpatching
//!
//! Chunk writers append to a [`ChunkBuffer`] strictly forward. A field whose
//! value is only known once the body has been written is reserved with
//! [`ChunkBuffer::reserve`], and later filled in through the returned
//! [`Placeholder`].

use crate::constants::align_up;
use crate::error::EncodeError;
use bytes::{BufMut, Bytes, BytesMut};

/// A reserved, zero-filled field waiting to be backpatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a reserved field must be backpatched"]
pub struct Placeholder {
    offset: usize,
    width: usize,
}

impl Placeholder {
    /// Absolute offset of the field in the container
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Width of the field in bytes
    pub fn width(&self) -> usize {
        self.width
    }
}

/// In-memory container with an owned write cursor at its end
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    buf: BytesMut,
}

impl ChunkBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Current write position, which is also the number of bytes written
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Written bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Append raw bytes
    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Append a byte
    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// Append a signed byte
    pub fn put_i8(&mut self, value: i8) {
        self.buf.put_i8(value);
    }

    /// Append a little-endian i16
    pub fn put_i16(&mut self, value: i16) {
        self.buf.put_i16_le(value);
    }

    /// Append a little-endian u32
    pub fn put_u32(&mut self, value: u32) {
        self.buf.put_u32_le(value);
    }

    /// Append a little-endian f32
    pub fn put_f32(&mut self, value: f32) {
        self.buf.put_f32_le(value);
    }

    /// Append `count` zero bytes
    pub fn put_zeros(&mut self, count: usize) {
        self.buf.put_bytes(0, count);
    }

    /// Zero-fill up to `offset`; does nothing if the cursor is already past it
    pub fn pad_to(&mut self, offset: usize) {
        let position = self.position();
        if offset > position {
            self.put_zeros(offset - position);
        }
    }

    /// Zero-fill up to the next chunk boundary and return the aligned position
    pub fn align(&mut self) -> usize {
        let aligned = align_up(self.position());
        self.pad_to(aligned);
        aligned
    }

    /// Reserve a zeroed field of `width` bytes at the cursor
    pub fn reserve(&mut self, width: usize) -> Placeholder {
        let offset = self.position();
        self.put_zeros(width);
        Placeholder { offset, width }
    }

    /// Overwrite a reserved field; `bytes` should match its width exactly
    ///
    /// Release builds never write outside the field: surplus bytes are
    /// dropped and a short patch leaves the rest of the field untouched.
    pub fn patch(&mut self, placeholder: Placeholder, bytes: &[u8]) {
        debug_assert_eq!(
            bytes.len(),
            placeholder.width,
            "backpatch width mismatch at offset {}",
            placeholder.offset
        );
        let len = bytes.len().min(placeholder.width);
        self.buf[placeholder.offset..placeholder.offset + len].copy_from_slice(&bytes[..len]);
    }

    /// Overwrite a reserved 2-byte field with a little-endian u16
    pub fn patch_u16(&mut self, placeholder: Placeholder, value: u16) {
        self.patch(placeholder, &value.to_le_bytes());
    }

    /// Overwrite a reserved 4-byte field with a little-endian u32
    pub fn patch_u32(&mut self, placeholder: Placeholder, value: u32) {
        self.patch(placeholder, &value.to_le_bytes());
    }

    /// Finish writing and hand out the bytes
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Narrow `value` to a byte field or report which field overflowed
pub fn fit_u8(field: &'static str, value: usize) -> Result<u8, EncodeError> {
    u8::try_from(value).map_err(|_| overflow(field, value, u8::MAX as usize))
}

/// Narrow `value` to a 2-byte field or report which field overflowed
pub fn fit_u16(field: &'static str, value: usize) -> Result<u16, EncodeError> {
    u16::try_from(value).map_err(|_| overflow(field, value, u16::MAX as usize))
}

/// Narrow `value` to a 4-byte field or report which field overflowed
pub fn fit_u32(field: &'static str, value: usize) -> Result<u32, EncodeError> {
    u32::try_from(value).map_err(|_| overflow(field, value, u32::MAX as usize))
}

fn overflow(field: &'static str, value: usize, max: usize) -> EncodeError {
    EncodeError::FieldOverflow { field, value, max }
}
