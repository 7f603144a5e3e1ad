//! # BBVH Core
//!
//! Converts BVH motion capture text into BBVH, a chunked little-endian binary
//! container with 64-byte aligned chunks and a compressed relocation trailer.
//!
//! ## Modules
//!
//! - `constants`: Container magic, chunk tags and layout offsets
//! - `types`: Core types (ParsedDocument, ChannelKind, QuantizationMode)
//! - `extractor`: Best-effort BVH text extraction
//! - `buffer`: Growable buffer with reserved fields and backpatching
//! - `hierarchy`: Hierarchy chunk writer
//! - `motion`: Motion chunk writer and sample quantization
//! - `relocation`: Relocation trailer chunk
//! - `encoder`: Container assembly and file conversion

#![warn(missing_docs)]

pub mod buffer;
pub mod constants;
pub mod encoder;
pub mod error;
pub mod extractor;
pub mod hierarchy;
pub mod motion;
pub mod relocation;
pub mod types;

// Re-export commonly used types
pub use encoder::{convert, ContainerBuilder, ContainerLayout, EncodedContainer};
pub use error::EncodeError;
pub use extractor::extract_document;
pub use types::{ChannelKind, JointChannels, ParsedDocument, QuantizationMode};

/// Result type alias for BBVH operations
pub type Result<T> = core::result::Result<T, EncodeError>;
