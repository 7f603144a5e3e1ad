//! Motion chunk writer and sample quantization
//!
//! Chunk layout:
//! 1. Tag (4 bytes): "NTOM"
//! 2. Aligned end offset (4 bytes, backpatched)
//! 3. Frame count (4 bytes)
//! 4. Frame time (4 bytes, f32)
//! 5. `frame_count` frame records, each a length prefix followed by one
//!    quantized sample per channel
//! 6. Zero padding to the next 64-byte boundary
//!
//! A frame prefix is a lossy position hint, not a full length. With 8-bit and
//! 16-bit samples it is `[len | 0x80, end & 0xFF]`; with f32 samples it is
//! two little-endian u16 words `[len | 0x8000, end & 0xFFFF]`. `len` counts
//! the prefix itself and `end` is the absolute offset after the record.

use crate::buffer::{fit_u32, ChunkBuffer};
use crate::constants::{
    CHUNK_ALIGNMENT, FRAME_FLAG_U16, FRAME_FLAG_U8, MOTION_HEADER_SIZE, MOTION_TAG,
};
use crate::error::EncodeError;
use crate::types::{ParsedDocument, QuantizationMode};

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Position of a written motion chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionChunk {
    /// Offset of the chunk tag
    pub pointer: usize,

    /// Aligned end offset, also stored in the chunk's size field
    pub end: usize,
}

/// Scale by 100 and truncate to i16, wrapping values outside its range
pub fn quantize_i16(sample: f64) -> i16 {
    (sample * 100.0) as i64 as i16
}

/// Narrow to IEEE-754 single precision
pub fn quantize_f32(sample: f64) -> f32 {
    sample as f32
}

/// Scale by 10, truncate, and clamp to the i8 range
pub fn quantize_i8(sample: f64) -> i8 {
    ((sample * 10.0) as i64).clamp(i8::MIN as i64, i8::MAX as i64) as i8
}

fn put_sample(buf: &mut ChunkBuffer, mode: QuantizationMode, sample: f64) {
    match mode {
        QuantizationMode::Int16 => buf.put_i16(quantize_i16(sample)),
        QuantizationMode::Float32 => buf.put_f32(quantize_f32(sample)),
        QuantizationMode::Int8 => buf.put_i8(quantize_i8(sample)),
    }
}

/// Bytes stored in a frame's length prefix
pub fn frame_prefix(mode: QuantizationMode, frame_len: usize, end: usize) -> Vec<u8> {
    match mode {
        QuantizationMode::Int16 | QuantizationMode::Int8 => {
            vec![(frame_len as u8) | FRAME_FLAG_U8, end as u8]
        }
        QuantizationMode::Float32 => {
            let mut prefix = Vec::with_capacity(4);
            prefix.extend_from_slice(&((frame_len as u16) | FRAME_FLAG_U16).to_le_bytes());
            prefix.extend_from_slice(&(end as u16).to_le_bytes());
            prefix
        }
    }
}

/// Aligned end offset of a motion chunk for `doc` starting at `pointer`
///
/// Fails with [`EncodeError::FieldOverflow`] when the end does not fit the
/// chunk's 4-byte size field.
pub fn motion_chunk_end(
    pointer: usize,
    doc: &ParsedDocument,
    mode: QuantizationMode,
) -> Result<usize, EncodeError> {
    let end = doc
        .channel_stride()
        .checked_mul(mode.sample_width())
        .and_then(|samples| samples.checked_add(mode.prefix_width()))
        .and_then(|frame| frame.checked_mul(doc.frame_count as usize))
        .and_then(|body| body.checked_add(MOTION_HEADER_SIZE))
        .and_then(|chunk| chunk.checked_add(pointer))
        .and_then(|end| end.checked_next_multiple_of(CHUNK_ALIGNMENT))
        .unwrap_or(usize::MAX);
    fit_u32("motion size", end)?;
    Ok(end)
}

/// Append the motion chunk for `doc` at the cursor
///
/// Fails before writing anything with [`EncodeError::SampleCountMismatch`] if
/// `doc.samples` cannot cover `frame_count * channel_stride` values, or with
/// [`EncodeError::FieldOverflow`] if the chunk would not fit its size field.
pub fn write_motion(
    buf: &mut ChunkBuffer,
    doc: &ParsedDocument,
    mode: QuantizationMode,
) -> Result<MotionChunk, EncodeError> {
    doc.validate_samples()?;
    let planned_end = motion_chunk_end(buf.position(), doc, mode)?;

    let pointer = buf.position();
    buf.put_slice(MOTION_TAG);
    let size_field = buf.reserve(4);
    buf.put_u32(doc.frame_count);
    buf.put_f32(doc.frame_time as f32);

    let mut cursor = 0;
    for _frame in 0..doc.frame_count {
        let prefix = buf.reserve(mode.prefix_width());

        for joint in &doc.channel_schema {
            let width = joint.width();
            for sample in &doc.samples[cursor..cursor + width] {
                put_sample(buf, mode, *sample);
            }
            cursor += width;
        }

        let end = buf.position();
        let frame_len = end - prefix.offset();
        buf.patch(prefix, &frame_prefix(mode, frame_len, end));

        #[cfg(feature = "logging")]
        trace!("Frame {} written at {} ({} bytes)", _frame, prefix.offset(), frame_len);
    }

    let end = buf.align();
    debug_assert_eq!(end, planned_end);
    buf.patch_u32(size_field, fit_u32("motion size", end)?);

    #[cfg(feature = "logging")]
    debug!(
        "Wrote motion chunk at {} ({} frames, mode {}, end {})",
        pointer,
        doc.frame_count,
        mode.as_u8(),
        end
    );

    Ok(MotionChunk { pointer, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChannelKind, JointChannels};

    fn doc_with(channels: usize, frames: u32, samples: Vec<f64>) -> ParsedDocument {
        let schema = vec![JointChannels::from_tokens(channels, ["Xposition"; 0])];
        ParsedDocument::new(1, schema, frames, 0.5, samples)
    }

    fn aligned_buffer() -> ChunkBuffer {
        let mut buf = ChunkBuffer::new();
        buf.put_zeros(128);
        buf
    }

    #[test]
    fn test_quantize_i16() {
        assert_eq!(quantize_i16(1.0), 100);
        assert_eq!(quantize_i16(-2.345), -234);
        assert_eq!(quantize_i16(30.0), 3000);
        // 400.0 * 100 = 40000 wraps
        assert_eq!(quantize_i16(400.0), (40000i64) as i16);
    }

    #[test]
    fn test_quantize_i8_clamps() {
        assert_eq!(quantize_i8(1.27), 12);
        assert_eq!(quantize_i8(-0.99), -9);
        assert_eq!(quantize_i8(100.0), 127);
        assert_eq!(quantize_i8(-100.0), -128);
    }

    #[test]
    fn test_quantize_f32_exact() {
        assert_eq!(quantize_f32(0.0333), 0.0333f32);
    }

    #[test]
    fn test_motion_header() {
        let doc = doc_with(2, 1, vec![1.0, 2.0]);
        let mut buf = aligned_buffer();
        let chunk = write_motion(&mut buf, &doc, QuantizationMode::Int16).unwrap();
        let bytes = buf.as_slice();

        assert_eq!(chunk.pointer, 128);
        assert_eq!(&bytes[128..132], b"NTOM");
        assert_eq!(u32::from_le_bytes(bytes[132..136].try_into().unwrap()), 192);
        assert_eq!(u32::from_le_bytes(bytes[136..140].try_into().unwrap()), 1);
        assert_eq!(f32::from_le_bytes(bytes[140..144].try_into().unwrap()), 0.5);
        assert_eq!(chunk.end, 192);
        assert_eq!(bytes.len(), 192);
    }

    #[test]
    fn test_int16_frame_record() {
        let doc = doc_with(2, 1, vec![1.0, -2.0]);
        let mut buf = aligned_buffer();
        write_motion(&mut buf, &doc, QuantizationMode::Int16).unwrap();
        let bytes = buf.as_slice();

        // frame starts at 144: prefix(2) + 2 * i16 = 6 bytes, ends at 150
        assert_eq!(bytes[144], 6 | 0x80);
        assert_eq!(bytes[145], 150);
        assert_eq!(i16::from_le_bytes([bytes[146], bytes[147]]), 100);
        assert_eq!(i16::from_le_bytes([bytes[148], bytes[149]]), -200);
    }

    #[test]
    fn test_float32_frame_record() {
        let doc = doc_with(1, 2, vec![0.1, -7.25]);
        let mut buf = aligned_buffer();
        write_motion(&mut buf, &doc, QuantizationMode::Float32).unwrap();
        let bytes = buf.as_slice();

        // prefix(4) + f32 = 8 bytes per frame
        assert_eq!(u16::from_le_bytes([bytes[144], bytes[145]]), 8 | 0x8000);
        assert_eq!(u16::from_le_bytes([bytes[146], bytes[147]]), 152);
        assert_eq!(f32::from_le_bytes(bytes[148..152].try_into().unwrap()), 0.1f32);
        assert_eq!(u16::from_le_bytes([bytes[152], bytes[153]]), 8 | 0x8000);
        assert_eq!(u16::from_le_bytes([bytes[154], bytes[155]]), 160);
        assert_eq!(f32::from_le_bytes(bytes[156..160].try_into().unwrap()), -7.25);
    }

    #[test]
    fn test_int8_frame_record() {
        let doc = doc_with(3, 1, vec![1.5, -20.0, 0.04]);
        let mut buf = aligned_buffer();
        write_motion(&mut buf, &doc, QuantizationMode::Int8).unwrap();
        let bytes = buf.as_slice();

        assert_eq!(bytes[144], 5 | 0x80);
        assert_eq!(bytes[145], 149);
        assert_eq!(&bytes[146..149], &[15u8, (-128i8) as u8, 0]);
    }

    #[test]
    fn test_zero_channels_yields_empty_frame_bodies() {
        let doc = ParsedDocument::new(0, Vec::new(), 3, 0.1, Vec::new());
        let mut buf = aligned_buffer();
        let chunk = write_motion(&mut buf, &doc, QuantizationMode::Int16).unwrap();
        let bytes = buf.as_slice();

        assert_eq!(&bytes[144..150], &[0x82, 146, 0x82, 148, 0x82, 150]);
        assert_eq!(chunk.end, 192);
    }

    #[test]
    fn test_zero_frames_metadata_only() {
        let doc = doc_with(6, 0, Vec::new());
        let mut buf = aligned_buffer();
        let chunk = write_motion(&mut buf, &doc, QuantizationMode::Float32).unwrap();
        assert_eq!(chunk.end, 192);
        assert!(buf.as_slice()[144..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_short_samples_fail_fast() {
        let doc = doc_with(3, 2, vec![1.0; 5]);
        let mut buf = aligned_buffer();
        let err = write_motion(&mut buf, &doc, QuantizationMode::Int16).unwrap_err();

        assert!(matches!(
            err,
            EncodeError::SampleCountMismatch {
                expected: 6,
                actual: 5
            }
        ));
        assert_eq!(buf.position(), 128);
    }

    #[test]
    fn test_stride_comes_from_channel_kinds() {
        let doc = ParsedDocument {
            joint_count: 1,
            channel_schema: vec![JointChannels {
                count: 3,
                kinds: vec![ChannelKind::PosX; 3],
            }],
            total_channel_count: 0,
            frame_count: 1,
            frame_time: 0.0,
            samples: Vec::new(),
        };
        let mut buf = aligned_buffer();
        let err = write_motion(&mut buf, &doc, QuantizationMode::Int16).unwrap_err();

        assert!(matches!(
            err,
            EncodeError::SampleCountMismatch {
                expected: 3,
                actual: 0
            }
        ));
        assert_eq!(buf.position(), 128);
    }

    #[test]
    fn test_planned_end_matches_written_chunk() {
        for mode in [
            QuantizationMode::Int16,
            QuantizationMode::Float32,
            QuantizationMode::Int8,
        ] {
            let doc = doc_with(3, 7, vec![1.0; 21]);
            let mut buf = aligned_buffer();
            let planned = motion_chunk_end(128, &doc, mode).unwrap();
            let chunk = write_motion(&mut buf, &doc, mode).unwrap();
            assert_eq!(chunk.end, planned);
        }
    }

    #[test]
    fn test_huge_frame_count_rejected_before_writing() {
        let doc = ParsedDocument::new(0, Vec::new(), u32::MAX, 0.1, Vec::new());
        let mut buf = aligned_buffer();
        let err = write_motion(&mut buf, &doc, QuantizationMode::Float32).unwrap_err();

        assert!(matches!(
            err,
            EncodeError::FieldOverflow {
                field: "motion size",
                ..
            }
        ));
        assert_eq!(buf.position(), 128);
    }

    #[test]
    fn test_prefix_truncates_to_field_width() {
        assert_eq!(frame_prefix(QuantizationMode::Int16, 300, 0x1234), vec![0xAC, 0x34]);
        assert_eq!(
            frame_prefix(QuantizationMode::Float32, 0x10, 0x12345),
            vec![0x10, 0x80, 0x45, 0x23]
        );
    }
}
