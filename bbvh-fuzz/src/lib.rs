//! Fuzzing entry points for bbvh-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_encode

use bbvh_core::{
    constants::HEADER_SIZE, encoder::ContainerBuilder, extractor::extract_document,
    motion::motion_chunk_end, QuantizationMode,
};

/// Largest motion chunk a single fuzz case may allocate
const MAX_FUZZ_MOTION_END: usize = 1 << 24;

pub fn fuzz_extract(data: &[u8]) {
    // Should never panic, whatever the text looks like
    let _ = extract_document(&String::from_utf8_lossy(data));
}

pub fn fuzz_encode(data: &[u8]) {
    let Some((&selector, text)) = data.split_first() else {
        return;
    };
    let mode = match selector % 3 {
        0 => QuantizationMode::Int16,
        1 => QuantizationMode::Float32,
        _ => QuantizationMode::Int8,
    };

    let doc = extract_document(&String::from_utf8_lossy(text));

    // valid but multi-gigabyte containers are out of reach for a fuzz case
    if matches!(motion_chunk_end(HEADER_SIZE, &doc, mode), Ok(end) if end > MAX_FUZZ_MOTION_END) {
        return;
    }

    // Either a container or an error, never a panic
    let _ = ContainerBuilder::new(mode)
        .end_marker(selector & 0x80 != 0)
        .encode(&doc);
}
