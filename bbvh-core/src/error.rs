//! Error types for BBVH encoding

/// Errors that can occur while converting a BVH document into a BBVH container
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// IO error while reading the source or writing the destination
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Quantization mode outside the supported set
    #[error("Unsupported quantization mode: {0} (expected 1, 2 or 3)")]
    UnsupportedMode(u8),

    /// The motion section holds fewer samples than the schema requires
    #[error("Sample count mismatch: expected at least {expected} samples, got {actual}")]
    SampleCountMismatch {
        /// frame_count * channel_stride
        expected: usize,
        /// Number of samples extracted from the motion section
        actual: usize,
    },

    /// A value does not fit the fixed-width field it is stored in
    #[error("Field overflow: {field} is {value}, maximum is {max}")]
    FieldOverflow {
        /// Name of the field
        field: &'static str,
        /// Value that was to be written
        value: usize,
        /// Largest value the field can hold
        max: usize,
    },
}
