//! Container assembly and the file conversion entry point
//!
//! The container is encoded with the following layout:
//! 1. Header (64 bytes): magic, total size (backpatched last), reserved zeros
//! 2. Hierarchy chunk, padded to a 64-byte boundary
//! 3. Motion chunk, padded to a 64-byte boundary
//! 4. Relocation chunk, padded to a 64-byte boundary
//! 5. Optional 4-byte end marker

use crate::buffer::{fit_u32, ChunkBuffer};
use crate::constants::{CONTAINER_MAGIC, END_MARKER, HEADER_SIZE, HEADER_SIZE_FIELD_OFFSET};
use crate::error::EncodeError;
use crate::extractor::extract_document;
use crate::hierarchy::write_hierarchy;
use crate::motion::write_motion;
use crate::relocation::{write_relocation, RelocationCodes};
use crate::types::{ParsedDocument, QuantizationMode};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

#[cfg(feature = "logging")]
use tracing::{debug, info};

/// Where each chunk of an encoded container landed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerLayout {
    /// Quantization mode used for the motion chunk
    pub mode: QuantizationMode,

    /// Offset right after the hierarchy tag
    pub hierarchy_pointer: usize,

    /// Offset of the motion tag
    pub motion_pointer: usize,

    /// Offset of the relocation tag
    pub relocation_pointer: usize,

    /// Compressed pointers stored in the relocation chunk
    pub relocation_codes: RelocationCodes,

    /// Aligned container size stored in the header
    pub container_size: usize,

    /// Whether the end marker follows the container
    pub end_marker: bool,
}

impl ContainerLayout {
    /// Number of bytes actually emitted, end marker included
    pub fn total_len(&self) -> usize {
        if self.end_marker {
            self.container_size + 4
        } else {
            self.container_size
        }
    }
}

/// A finished container and its layout
#[derive(Debug, Clone)]
pub struct EncodedContainer {
    /// Container bytes, ready to be written out
    pub bytes: Bytes,

    /// Chunk positions
    pub layout: ContainerLayout,
}

/// Builder for encoding documents with a given set of options
#[derive(Debug, Clone, Copy)]
pub struct ContainerBuilder {
    mode: QuantizationMode,
    end_marker: bool,
}

impl ContainerBuilder {
    /// Create a builder for `mode`, without end marker
    pub fn new(mode: QuantizationMode) -> Self {
        Self {
            mode,
            end_marker: false,
        }
    }

    /// Append the end marker after the aligned container
    pub fn with_end_marker(mut self) -> Self {
        self.end_marker = true;
        self
    }

    /// Set whether the end marker is appended
    pub fn end_marker(mut self, enabled: bool) -> Self {
        self.end_marker = enabled;
        self
    }

    /// Extract `text` and encode the resulting document
    pub fn encode_text(&self, text: &str) -> Result<EncodedContainer, EncodeError> {
        self.encode(&extract_document(text))
    }

    /// Encode an already extracted document
    pub fn encode(&self, doc: &ParsedDocument) -> Result<EncodedContainer, EncodeError> {
        let mut buf = ChunkBuffer::with_capacity(estimate_size(doc, self.mode));

        buf.put_u32(CONTAINER_MAGIC);
        let size_field = buf.reserve(4);
        debug_assert_eq!(size_field.offset(), HEADER_SIZE_FIELD_OFFSET);
        buf.pad_to(HEADER_SIZE);

        let hierarchy = write_hierarchy(&mut buf, doc)?;
        let motion = write_motion(&mut buf, doc, self.mode)?;
        let relocation = write_relocation(&mut buf, hierarchy.pointer, motion.pointer);
        let relocation_pointer = relocation.pointer;
        let relocation_codes = relocation.codes;

        let container_size = relocation.finish(&mut buf)?;
        buf.patch_u32(size_field, fit_u32("container size", container_size)?);

        if self.end_marker {
            buf.put_u32(END_MARKER);
        }

        #[cfg(feature = "logging")]
        debug!(
            "Encoded container: hierarchy {}, motion {}, relocation {}, size {}",
            hierarchy.pointer, motion.pointer, relocation_pointer, container_size
        );

        Ok(EncodedContainer {
            bytes: buf.freeze(),
            layout: ContainerLayout {
                mode: self.mode,
                hierarchy_pointer: hierarchy.pointer,
                motion_pointer: motion.pointer,
                relocation_pointer,
                relocation_codes,
                container_size,
                end_marker: self.end_marker,
            },
        })
    }
}

/// Encode `doc` into a container
pub fn encode_document(
    doc: &ParsedDocument,
    mode: QuantizationMode,
    end_marker: bool,
) -> Result<EncodedContainer, EncodeError> {
    ContainerBuilder::new(mode).end_marker(end_marker).encode(doc)
}

/// Read BVH text from `reader` and write the BBVH container to `destination`
///
/// `mode` is 1 (i16 scaled by 100), 2 (f32) or 3 (i8 scaled by 10).
pub fn convert<R, P>(
    reader: &mut R,
    destination: P,
    mode: u8,
    end_marker: bool,
) -> Result<(), EncodeError>
where
    R: Read,
    P: AsRef<Path>,
{
    convert_with_layout(reader, destination, mode, end_marker).map(|_| ())
}

/// Same as [`convert`], also returning the extracted document and the layout
pub fn convert_with_layout<R, P>(
    reader: &mut R,
    destination: P,
    mode: u8,
    end_marker: bool,
) -> Result<(ParsedDocument, ContainerLayout), EncodeError>
where
    R: Read,
    P: AsRef<Path>,
{
    let mode = QuantizationMode::try_from(mode)?;

    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let doc = extract_document(&text);
    let encoded = encode_document(&doc, mode, end_marker)?;

    let mut file = File::create(destination.as_ref())?;
    file.write_all(&encoded.bytes)?;
    file.flush()?;

    #[cfg(feature = "logging")]
    info!(
        "Wrote {} bytes to {}",
        encoded.bytes.len(),
        destination.as_ref().display()
    );

    Ok((doc, encoded.layout))
}

fn estimate_size(doc: &ParsedDocument, mode: QuantizationMode) -> usize {
    let frame = doc
        .channel_stride()
        .saturating_mul(mode.sample_width())
        .saturating_add(mode.prefix_width());
    let motion = (doc.frame_count as usize).saturating_mul(frame);
    // header + hierarchy block + motion header + trailer, plus slack for padding
    HEADER_SIZE.saturating_add(256).saturating_add(motion.min(1 << 26))
}
